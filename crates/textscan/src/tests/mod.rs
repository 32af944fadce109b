mod property_query;
pub(crate) mod utils;

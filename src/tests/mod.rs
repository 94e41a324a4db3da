mod helpers;
mod query;

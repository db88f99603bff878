mod spy_search;

pub use spy_search::SpySearch;

pub mod http;

pub use http::HttpLmsAdapter;

pub mod http_retrieval_client;
pub mod viewer;

pub use http_retrieval_client::HttpRetrievalClient;
pub use viewer::viewer_url;

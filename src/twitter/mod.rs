// Twitter API access: signing, client, timeline paging.
//
// The SocialApi trait is what the pipeline depends on; TwitterClient is
// the v1.1 REST implementation.

pub mod client;
pub mod models;
pub mod oauth;
pub mod timeline;
pub mod traits;

pub use models::Post;
pub use traits::SocialApi;

pub mod google;
mod registry;

pub use google::GoogleProvider;
pub use registry::{SocialProfile, SocialProvider, SocialProviderId, SocialProviders};

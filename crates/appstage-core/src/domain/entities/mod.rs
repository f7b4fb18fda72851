pub mod app;
pub mod common;
pub mod destinations;
pub mod ignore_list;

pub use crate::domain::DomainError;
pub use app::{AppDescriptor, AppDescriptorBuilder};
pub use common::RelativePath;
pub use destinations::{DestinationTemplate, SpecialDestination, SpecialDestinations};
pub use ignore_list::IgnoreList;

//! Maven repository protocol: POM parsing, repository addressing, the local
//! cache, HTTP fetching, and the manifest store that ties them together.

pub mod cache;
pub mod download;
pub mod pom;
pub mod repository;
pub mod store;

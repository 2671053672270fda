//! Client-side state layer for an embedding-cluster viewer.
//!
//! Architecture:
//! ```text
//!   ┌──────────────────┐
//!   │ DatasetRegistry   │  ordered dataset descriptors → dropdown
//!   └──────────────────┘
//!            │ user picks a dataset
//!            ▼
//!   external loader ──▶ FilterStore::set_all_records
//!            │
//!            ▼
//!   ┌──────────────────┐
//!   │ FilterStore       │  complete / filtered / criteria cells
//!   └──────────────────┘
//!            │ derived
//!            ▼
//!   effective_records ──▶ rendering layer (subscribers)
//! ```
//!
//! The dropdown widget, the cluster/image loader, and the rendering layer
//! are external collaborators; this crate only owns the state between them.

pub mod filter;
pub mod registry;
pub mod store;

pub use filter::FilterStore;
pub use registry::{DatasetDescriptor, DatasetRegistry, RegistryError};
pub use store::{derived, derived2, derived3, Derived, ReadHandle, Store, Subscription};

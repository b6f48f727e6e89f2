/// Collaborators the steps depend on
///
/// The traits describe what a step needs from storage, paging, policies
/// and response shaping. The concrete types are in-memory versions used
/// by the bundled server and by tests.

mod memory;
mod page;
mod policy;
mod responses;
mod traits;

pub use memory::MemoryStore;
pub use page::{Page, PageMeta, SlicePaginator};
pub use policy::OwnerPolicy;
pub use responses::JsonResponses;
pub use traits::{CollectionProvider, ModelFinder, PolicyProvider, ResponseBuilder};

//! Crew definition and assembly
//!
//! - [`Persona`] and [`Step`]: typed records, validated when a [`CrewRegistry`] loads
//! - [`select`]: forgiving name/index selection for custom runs
//! - [`Crew`]: personas bound to a provider, their models and the shared tools

mod assembly;
mod persona;
mod registry;
mod selection;
mod step;

pub use assembly::{build_tool_registry, Crew, CrewMember, RunPlan};
pub use persona::{ModelTier, Persona};
pub use registry::{user_crew_path, CrewRegistry, BUILTIN_CREW};
pub use selection::{parse_list, select, Selection};
pub use step::{Step, DESCRIPTION_PLACEHOLDER};

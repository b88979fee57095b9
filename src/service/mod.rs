//! Service layer
//!
//! Contains the flows that sit between a view and the entity store:
//! anything that awaits a collaborator, and calendar logic for the
//! patrol schedule.

mod assistant;
mod reporting;
pub mod schedule;

pub use assistant::{AssistantChat, ChatMessage, ChatRole, GREETING};
pub use reporting::ReportingService;
pub use schedule::{AgendaDay, WeekView};

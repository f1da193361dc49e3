mod task;
pub use task::{CommandSpec, CommandUri, ContainerSpec, TaskDescriptor};

pub mod decoder;
pub mod dispatch;
pub mod encoder;
pub mod header;
pub mod helpers;
pub mod record;
pub mod sync;

// Re-export main public functions
pub use decoder::emit_unmarshal_fn;
pub use dispatch::{emit_create_table, emit_dispatch_switch};
pub use encoder::emit_marshal_fn;
pub use header::emit_header;
pub use record::emit_command_struct;
pub use sync::emit_sync_fn;

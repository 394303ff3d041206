//! Command-Queue Marshalling Generator
//!
//! Turns resolved operation signatures into the C unit that captures
//! calls into packed command records on a producer thread and replays
//! them on a consumer thread. Classification, record layout, and the
//! text emitters live here; description loading lives in
//! `marshal_loader`.

pub mod classify;
pub mod codegen;
pub mod layout;
pub mod plan;

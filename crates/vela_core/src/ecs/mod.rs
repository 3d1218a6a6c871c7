//! # ECS Primitives
//!
//! Building blocks for the fixed-capacity world defined downstream:
//! entity identifiers, the component trait, and dense pre-allocated
//! component storage.
//!
//! The concrete world type lives with the components it stores; this
//! module only provides the substrate.

pub mod component;
pub mod entity;
pub mod storage;

//! The labeled-property graph layer.
//!
//! Everything the domain components know about persistence lives behind this
//! module: typed nodes, typed directed edges, and the [`GraphStore`]
//! capability with atomic multi-write transactions.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      GraphStore                             │
//! │                                                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Node table  │  │ Edge table  │  │ Uniqueness          │  │
//! │  │ (label +    │  │ (typed,     │  │ constraints         │  │
//! │  │  properties)│  │  directed)  │  │ (label, key)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! │                                                             │
//! │  run_atomic: all writes in a block commit together          │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod edge;
mod node;
mod store;

pub use edge::{Edge, EdgeFilter, EdgeType};
pub use node::{encode, Label, Node, NodeId, Properties};
pub use store::{GraphReader, GraphSnapshot, GraphStore, GraphWriter, MemoryGraph, StoreError};

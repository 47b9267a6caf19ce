// ─── javascout Core ───
// Runtime discovery engine: finds usable Java installations on a host
// without prior knowledge of where they were installed.
//
// Architecture:
//   core/
//     config    — heuristic keyword set, embedded defaults + file override
//     ports     — filesystem / environment / registry / drive capability traits
//     discovery — probes, bounded tree search, per-platform strategies
//     error     — central error type

pub mod config;
pub mod discovery;
pub mod error;
pub mod ports;

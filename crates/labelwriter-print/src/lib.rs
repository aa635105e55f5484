// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LabelWriter Print — pinned HTTPS transport to the local label printing
// service, parsers for its XML/JSON answers, the print parameter encoder and
// the client operations built on top of them.

pub mod client;
pub mod consumables;
pub mod fetch;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod params;
pub mod printers;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::LabelWriterClient;
pub use consumables::parse_consumable_info;
pub use fetch::FetchTransport;
#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeTransport;
pub use params::encode_params;
pub use printers::parse_printers;
pub use transport::{Method, Transport, TransportKind, TransportRequest, UniformResponse};

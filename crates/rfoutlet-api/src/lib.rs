// rfoutlet-api: WebSocket transport and wire types for the rfoutlet outlet server

pub mod error;
pub mod listeners;
pub mod websocket;
pub mod wire;

pub use error::Error;
pub use listeners::ListenerId;
pub use websocket::{CloseEvent, Connection, ConnectionConfig};
pub use wire::{Envelope, MessageType, WireDayTime, WireGroup, WireInterval, WireOutlet};

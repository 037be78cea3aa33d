// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Der Receiver Task besitzt Link, Strip und Frame Buffer allein (kein Locking),
// der Net Task treibt den embassy-net Stack.

pub mod receiver;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use receiver::{receiver_logic, receiver_task};
pub use wifi::{UdpBuffers, WifiLink, net_task};

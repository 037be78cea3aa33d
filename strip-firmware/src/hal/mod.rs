// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus strip-core für die echte Hardware.
// Mocks für Host-Tests liegen in strip-tests.

pub mod led_writer;

pub use led_writer::RmtStripWriter;

// WiFi Link - Verbindet mit WLAN und empfängt UDP-Datagramme
use core::net::SocketAddr;
use core::task::{Context, Poll, Waker};

use defmt::{Debug2Format, error, info, warn};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Ipv4Cidr, Runner, Stack};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice};
use strip_core::{Datagram, LinkError, NetworkLink};

use crate::config::{
    UDP_META_SLOTS, UDP_PORT, UDP_RX_BUFFER_SIZE, UDP_TX_BUFFER_SIZE, WIFI_PASSWORD, WIFI_SSID,
};

/// Statische Buffer für den UDP-Socket
///
/// Muss 'static sein, weil der Socket im Receiver Task lebt.
pub struct UdpBuffers {
    rx_meta: [PacketMetadata; UDP_META_SLOTS],
    rx: [u8; UDP_RX_BUFFER_SIZE],
    tx_meta: [PacketMetadata; 1],
    tx: [u8; UDP_TX_BUFFER_SIZE],
}

impl UdpBuffers {
    pub const fn new() -> Self {
        Self {
            rx_meta: [PacketMetadata::EMPTY; UDP_META_SLOTS],
            rx: [0; UDP_RX_BUFFER_SIZE],
            tx_meta: [PacketMetadata::EMPTY; 1],
            tx: [0; UDP_TX_BUFFER_SIZE],
        }
    }
}

impl Default for UdpBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// Network Link für die echte Hardware
///
/// - WiFi Station über esp-radio
/// - IP-Adresse via DHCP (embassy-net)
/// - UDP-Socket auf `UDP_PORT`
///
/// "Verbunden" heißt: mit dem Access Point assoziiert UND IPv4-Adresse erhalten.
pub struct WifiLink {
    controller: WifiController<'static>,
    stack: Stack<'static>,
    socket: UdpSocket<'static>,
}

impl WifiLink {
    pub fn new(
        controller: WifiController<'static>,
        stack: Stack<'static>,
        buffers: &'static mut UdpBuffers,
    ) -> Self {
        let socket = UdpSocket::new(
            stack,
            &mut buffers.rx_meta,
            &mut buffers.rx,
            &mut buffers.tx_meta,
            &mut buffers.tx,
        );

        Self {
            controller,
            stack,
            socket,
        }
    }

    /// Aktuelle IPv4-Adresse aus DHCP
    pub fn address(&self) -> Option<Ipv4Cidr> {
        self.stack.config_v4().map(|config| config.address)
    }

    /// Konfiguriert und startet den WiFi-Treiber, falls noch nicht geschehen
    async fn ensure_started(&mut self) -> Result<(), LinkError> {
        if matches!(self.controller.is_started(), Ok(true)) {
            return Ok(());
        }

        info!("WiFi: Configuring and starting...");

        // Configure WiFi station mode
        let client_config = ModeConfig::Client(
            ClientConfig::default()
                .with_ssid(WIFI_SSID.into())
                .with_password(WIFI_PASSWORD.into()),
        );

        self.controller.set_config(&client_config).map_err(|e| {
            error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
            LinkError::ConfigFailed
        })?;

        self.controller.start_async().await.map_err(|e| {
            error!("WiFi: Failed to start: {}", Debug2Format(&e));
            LinkError::StartFailed
        })?;

        info!("WiFi: Started successfully");
        Ok(())
    }
}

impl NetworkLink for WifiLink {
    async fn begin_connect(&mut self) -> Result<(), LinkError> {
        self.ensure_started().await?;

        // Alte Assoziation ohne IP-Adresse verwerfen
        if matches!(self.controller.is_connected(), Ok(true)) {
            if let Err(e) = self.controller.disconnect() {
                warn!("WiFi: Disconnect failed: {}", Debug2Format(&e));
            }
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        self.controller.connect().map_err(|e| {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            LinkError::ConnectFailed
        })
    }

    fn is_connected(&self) -> bool {
        matches!(self.controller.is_connected(), Ok(true)) && self.stack.config_v4().is_some()
    }

    fn open_receiver(&mut self) -> Result<(), LinkError> {
        self.socket.close();
        self.socket.bind(UDP_PORT).map_err(|e| {
            error!("UDP: Bind to port {} failed: {}", UDP_PORT, Debug2Format(&e));
            LinkError::BindFailed
        })?;

        info!(
            "UDP: Listening on {}, port {}",
            Debug2Format(&self.address()),
            UDP_PORT
        );
        Ok(())
    }

    fn try_receive(&mut self, buf: &mut [u8]) -> Option<Datagram> {
        // Einmal pollen ohne Waker: liefert sofort Pending, wenn nichts da ist
        let mut cx = Context::from_waker(Waker::noop());

        match self.socket.poll_recv_from(buf, &mut cx) {
            Poll::Ready(Ok((len, meta))) => Some(Datagram {
                len,
                source: Some(SocketAddr::new(meta.endpoint.addr.into(), meta.endpoint.port)),
            }),
            // Truncated: Datagramm größer als `buf`, wird verworfen
            Poll::Ready(Err(e)) => {
                warn!("UDP: Receive failed: {}", Debug2Format(&e));
                None
            }
            Poll::Pending => None,
        }
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - DHCP und IPv4-Fragment-Reassembly
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

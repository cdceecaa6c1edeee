//! Master and receivers wired together through recording buses and an
//! in-memory radio.

use heapless::String;
use skyline_core::{
    advertised_name, ControlInput, ControlSample, FrameReceiver, NodeConfig, SyncScheduler,
};
use skyline_display::{Building, DisplayBuffer, RenderMode};
use skyline_drivers::Ht16k33;
use skyline_hal::{
    I2cBus, MacAddress, NetworkScanner, PeerError, PeerInfo, Radio, ScanRecord, SendError,
};

#[derive(Default)]
struct RecordingBus {
    writes: Vec<(u8, Vec<u8>)>,
}

impl RecordingBus {
    /// RAM writes only, i.e. the images that reached the units
    fn ram_writes(&self) -> Vec<(u8, Vec<u8>)> {
        self.writes
            .iter()
            .filter(|(_, data)| data.len() == 17)
            .cloned()
            .collect()
    }
}

impl I2cBus for RecordingBus {
    type Error = ();

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ()> {
        self.writes.push((address, data.to_vec()));
        Ok(())
    }
}

#[derive(Default)]
struct Air {
    peers: Vec<MacAddress>,
    sent: Vec<(MacAddress, Vec<u8>)>,
}

impl Radio for Air {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        Ok(())
    }

    fn add_peer(&mut self, peer: &PeerInfo) -> Result<(), PeerError> {
        self.peers.push(peer.address);
        Ok(())
    }

    fn send(&mut self, to: &MacAddress, data: &[u8]) -> Result<(), SendError> {
        if !self.peers.contains(to) {
            return Err(SendError::NotFound);
        }
        self.sent.push((*to, data.to_vec()));
        Ok(())
    }
}

struct Neighbourhood(Vec<MacAddress>);

impl NetworkScanner for Neighbourhood {
    type Error = ();

    fn scan<F: FnMut(&ScanRecord)>(&mut self, mut visit: F) -> Result<usize, ()> {
        let mut other = String::new();
        other.push_str("HomeRouter").unwrap();
        visit(&ScanRecord {
            ssid: other,
            bssid: MacAddress::new([0xAA; 6]),
            rssi: -40,
        });
        for mac in &self.0 {
            visit(&ScanRecord {
                ssid: advertised_name("Slave", mac),
                bssid: *mac,
                rssi: -60,
            });
        }
        Ok(self.0.len() + 1)
    }
}

struct Knob {
    brightness: u8,
}

impl ControlInput for Knob {
    fn sample(&mut self) -> ControlSample {
        ControlSample {
            level: 0,
            brightness: self.brightness,
            click: None,
        }
    }
}

const RX_A: MacAddress = MacAddress([0x30, 0xAE, 0xA4, 0x00, 0x00, 0x01]);
const RX_B: MacAddress = MacAddress([0x30, 0xAE, 0xA4, 0x00, 0x00, 0x02]);

#[test]
fn test_receivers_mirror_master() {
    let mut master_bus = RecordingBus::default();
    let building = Building::initialize(Ht16k33::new(&mut master_bus)).unwrap();
    let mut master: SyncScheduler<_, _, _, 4> = SyncScheduler::new(
        NodeConfig::default(),
        building,
        Air::default(),
        Neighbourhood(vec![RX_A, RX_B]),
    );
    master.start(0).unwrap();
    master.set_sampling_number(254);
    master.set_digit(9);

    let mut knob = Knob { brightness: 10 };
    master.poll(0, &mut knob).unwrap();
    assert_eq!(master.registry().len(), 2);
    assert_eq!(master.sampling_number(), 255);

    master.poll(100, &mut knob).unwrap();
    assert_eq!(master.sampling_number(), 0);

    let mut expected = DisplayBuffer::new();
    expected.show_meta_number(9, RenderMode::Normal);
    assert_eq!(master.building().buffer(), &expected);

    let sent = master.radio().sent.clone();
    assert_eq!(sent.len(), 4);
    assert_eq!(sent[0].1[5], 254);
    assert_eq!(sent[2].1[5], 255);
    drop(master);

    for mac in [RX_A, RX_B] {
        let mut rx_bus = RecordingBus::default();
        let mut rx = FrameReceiver::new(Building::initialize(Ht16k33::new(&mut rx_bus)).unwrap());
        for (to, bytes) in sent.iter().filter(|(to, _)| *to == mac) {
            assert_eq!(*to, mac);
            rx.on_frame(&MacAddress::new([0x24; 6]), bytes);
        }

        assert_eq!(rx.building().buffer(), &expected);
        assert_eq!(rx.building().brightness(), 10);
        assert_eq!(rx.last_sampling_number(), Some(255));
        assert_eq!(rx.stats().gaps, 0);
        drop(rx);

        // Same images on the same unit addresses as the master
        assert_eq!(rx_bus.ram_writes(), master_bus.ram_writes());
    }
}

#[test]
fn test_corrupted_frame_leaves_receiver_untouched() {
    let mut master_bus = RecordingBus::default();
    let building = Building::initialize(Ht16k33::new(&mut master_bus)).unwrap();
    let mut master: SyncScheduler<_, _, _, 4> = SyncScheduler::new(
        NodeConfig::default(),
        building,
        Air::default(),
        Neighbourhood(vec![RX_A]),
    );
    master.start(0).unwrap();
    master.set_digit(4);
    master.poll(0, &mut Knob { brightness: 6 }).unwrap();
    let mut bytes = master.radio().sent[0].1.clone();
    drop(master);

    let mut rx_bus = RecordingBus::default();
    let mut rx = FrameReceiver::new(Building::initialize(Ht16k33::new(&mut rx_bus)).unwrap());
    bytes[2] = b'X';
    rx.on_frame(&RX_A, &bytes);
    rx.on_frame(&RX_A, &bytes[..32]);

    assert_eq!(rx.building().buffer(), &DisplayBuffer::new());
    assert_eq!(rx.stats().dropped, 2);
    drop(rx);
    assert!(rx_bus.ram_writes().is_empty());
}

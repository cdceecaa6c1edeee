//! One master and its receivers on a shared in-memory medium

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use heapless::String;
use skyline_core::sync::{init_radio, ReceiveStats, SharedReceiver};
use skyline_core::{advertised_name, FrameReceiver, SyncError, SyncScheduler, ESP_NOW_PEER_MAX};
use skyline_display::Building;
use skyline_drivers::Ht16k33;
use skyline_hal::MacAddress;

use crate::air::{Ether, SimRadio, SimScanner};
use crate::config::SimConfig;
use crate::input::ScriptedInput;
use crate::panel::{Panel, SimBus};

const MASTER_MAC: MacAddress = MacAddress([0x24, 0x0A, 0xC4, 0x00, 0x00, 0x01]);
const DECOY_MAC: MacAddress = MacAddress([0xA4, 0x2B, 0xB0, 0x11, 0x22, 0x33]);
const DECOY_SSID: &str = "HomeRouter";

type Master = SyncScheduler<Ht16k33<SimBus>, SimRadio, SimScanner, ESP_NOW_PEER_MAX>;

/// A receiver node and the bus it drives
pub struct ReceiverNode {
    pub mac: MacAddress,
    station: usize,
    bus: SimBus,
    receiver: SharedReceiver<NoopRawMutex, Ht16k33<SimBus>>,
}

impl ReceiverNode {
    pub fn panel(&self) -> Panel {
        self.bus.panel()
    }

    pub fn stats(&self) -> ReceiveStats {
        self.receiver.with(|rx| rx.stats())
    }
}

pub struct Simulation {
    ether: Rc<RefCell<Ether>>,
    master: Master,
    master_bus: SimBus,
    input: ScriptedInput,
    receivers: Vec<ReceiverNode>,
    tick_ms: u32,
}

fn ssid(name: &str) -> Result<String<32>> {
    let mut s = String::new();
    s.push_str(name)
        .map_err(|_| anyhow!("name too long: {}", name))?;
    Ok(s)
}

impl Simulation {
    /// Bring up every node; fails if a radio does not start
    pub fn new(config: &SimConfig, radio_down: bool) -> Result<Self> {
        let ether = Ether::new(config.loss_every);
        let prefix = config.node.ssid_prefix.as_str();
        {
            let mut air = ether.borrow_mut();
            air.join(MASTER_MAC, ssid("Master")?, 0);
            air.join(DECOY_MAC, ssid(DECOY_SSID)?, -80);
        }

        let mut receivers = Vec::with_capacity(config.receivers);
        for i in 0..config.receivers {
            let mac = MacAddress::new([0x30, 0xAE, 0xA4, 0x00, 0x00, i as u8 + 1]);
            let station = ether
                .borrow_mut()
                .join(mac, advertised_name(prefix, &mac), -50 - i as i8);

            let mut radio = SimRadio::new(ether.clone(), mac, ESP_NOW_PEER_MAX);
            init_radio::<_, ()>(&mut radio)
                .map_err(|e| anyhow!("receiver {} radio: {:?}", mac, e))?;

            let bus = SimBus::new();
            let mut building = Building::initialize(Ht16k33::new(bus.clone()))?;
            building.set_brightness(config.node.initial_brightness)?;
            receivers.push(ReceiverNode {
                mac,
                station,
                bus,
                receiver: SharedReceiver::new(FrameReceiver::new(building)),
            });
        }

        let mut radio = SimRadio::new(ether.clone(), MASTER_MAC, ESP_NOW_PEER_MAX);
        if radio_down {
            radio = radio.fail_init();
        }
        let master_bus = SimBus::new();
        let building = Building::initialize(Ht16k33::new(master_bus.clone()))?;
        let scanner = SimScanner::new(ether.clone(), radio.mac());
        let mut master = Master::new(config.node.clone(), building, radio, scanner);
        master.start(0).map_err(|e| match e {
            SyncError::RadioInit => anyhow!("master radio failed to start, restart required"),
            SyncError::Display(e) => anyhow!("master display: {}", e),
        })?;

        Ok(Self {
            ether,
            master,
            master_bus,
            input: ScriptedInput::new(config.script.clone(), config.node.initial_brightness),
            receivers,
            tick_ms: config.tick_ms,
        })
    }

    /// Advance every node to tick `tick`; returns whether a frame went out
    pub fn step(&mut self, tick: u32) -> bool {
        let now_ms = tick.wrapping_mul(self.tick_ms);
        let before = self.master.sampling_number();

        self.input.advance_to(now_ms);
        if let Err(e) = self.master.poll(now_ms, &mut self.input) {
            log::warn!("master: {:?}", e);
        }

        let reports = self.ether.borrow_mut().take_reports();
        for (to, status) in reports {
            self.master.on_send_complete(&to, status);
        }

        let ether = self.ether.borrow();
        for node in &self.receivers {
            let inbox = &ether.station(node.station).inbox;
            node.receiver.with(|rx| rx.drain(inbox));
        }

        self.master.sampling_number() != before
    }

    pub fn master(&self) -> &Master {
        &self.master
    }

    pub fn master_panel(&self) -> Panel {
        self.master_bus.panel()
    }

    pub fn receivers(&self) -> &[ReceiverNode] {
        &self.receivers
    }
}

//! BLE transport adapter.
//!
//! Implements [`TransportPort`] — the hexagonal boundary for the
//! single-byte command channel. A central connects, writes one byte to
//! the switch characteristic, and the session loop polls it out.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: Bluedroid BLE GATT server via
//!   `esp_idf_svc::sys`.
//! - **all other targets**: simulation state for host-side tests.
//!
//! ## GATT Service Layout
//!
//! | Characteristic | UUID                                   | Perms      |
//! |----------------|----------------------------------------|------------|
//! | Switch (1 byte)| `19B10001-E8F2-537E-4F6C-D104768A1214` | Read+Write |

#[cfg(target_os = "espidf")]
use core::fmt::Write as _;
use log::info;

use crate::app::ports::{PeerId, TransportPort};
#[cfg(target_os = "espidf")]
use crate::error::CommsError;
use crate::error::Result;

// ───────────────────────────────────────────────────────────────
// Constants
// ───────────────────────────────────────────────────────────────

/// LED service UUID, stable across firmware revisions.
pub const SERVICE_UUID: u128 = 0x19B10000_E8F2_537E_4F6C_D104768A1214;
/// Single-byte switch characteristic, read/writable by the central.
pub const CHAR_SWITCH: u128 = 0x19B10001_E8F2_537E_4F6C_D104768A1214;

// ───────────────────────────────────────────────────────────────
// Adapter state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BleState {
    Idle,
    Advertising,
    Failed,
}

// ── ESP-IDF BLE static state (callback-task safe) ─────────────
//
// Bluedroid callbacks are C function pointers that cannot capture Rust
// closures. These statics bridge the callback context to the adapter.
// GATTS callbacks run in the Bluedroid task (not ISR), so atomics with
// relaxed ordering and a std Mutex are safe here.

#[cfg(target_os = "espidf")]
use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering as AtomicOrdering};

/// Sentinel for "no command pending" in [`BLE_PENDING_CMD`].
#[cfg(target_os = "espidf")]
const NO_PENDING: u16 = 0xFFFF;

#[cfg(target_os = "espidf")]
static BLE_SVC_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_SWITCH_CHAR_HANDLE: AtomicU32 = AtomicU32::new(0);
#[cfg(target_os = "espidf")]
static BLE_CONNECTED: AtomicBool = AtomicBool::new(false);
#[cfg(target_os = "espidf")]
static BLE_PENDING_CMD: AtomicU16 = AtomicU16::new(NO_PENDING);
#[cfg(target_os = "espidf")]
static BLE_PEER_ADDR: std::sync::Mutex<[u8; 6]> = std::sync::Mutex::new([0; 6]);

#[cfg(target_os = "espidf")]
fn uuid128_to_esp(uuid: u128) -> esp_idf_svc::sys::esp_bt_uuid_t {
    let mut t: esp_idf_svc::sys::esp_bt_uuid_t = unsafe { core::mem::zeroed() };
    t.len = 16;
    unsafe {
        t.uuid.uuid128 = uuid.to_le_bytes();
    }
    t
}

#[cfg(target_os = "espidf")]
unsafe fn restart_advertising() {
    use esp_idf_svc::sys::*;
    let mut adv_params = esp_ble_adv_params_t {
        adv_int_min: 0x20,
        adv_int_max: 0x40,
        adv_type: esp_ble_adv_type_t_ADV_TYPE_IND,
        own_addr_type: esp_ble_addr_type_t_BLE_ADDR_TYPE_PUBLIC,
        channel_map: esp_ble_adv_channel_t_ADV_CHNL_ALL,
        adv_filter_policy: esp_ble_adv_filter_t_ADV_FILTER_ALLOW_SCAN_ANY_CON_ANY,
        ..unsafe { core::mem::zeroed() }
    };
    unsafe {
        esp_ble_gap_start_advertising(&mut adv_params);
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gap_event_handler(
    event: esp_idf_svc::sys::esp_gap_ble_cb_event_t,
    _param: *mut esp_idf_svc::sys::esp_ble_gap_cb_param_t,
) {
    use esp_idf_svc::sys::*;
    match event {
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_START_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising started");
        }
        esp_gap_ble_cb_event_t_ESP_GAP_BLE_ADV_STOP_COMPLETE_EVT => {
            log::info!("BLE GAP: advertising stopped");
        }
        _ => {}
    }
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn ble_gatts_event_handler(
    event: esp_idf_svc::sys::esp_gatts_cb_event_t,
    gatts_if: esp_idf_svc::sys::esp_gatt_if_t,
    param: *mut esp_idf_svc::sys::esp_ble_gatts_cb_param_t,
) {
    use esp_idf_svc::sys::*;

    match event {
        esp_gatts_cb_event_t_ESP_GATTS_REG_EVT => {
            log::info!("BLE GATTS: app registered (if={})", gatts_if);
            let svc_uuid = uuid128_to_esp(SERVICE_UUID);
            let mut svc_id = esp_gatt_srvc_id_t {
                id: esp_gatt_id_t {
                    uuid: svc_uuid,
                    inst_id: 0,
                },
                is_primary: true,
            };
            unsafe {
                esp_ble_gatts_create_service(gatts_if, &mut svc_id, 4);
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_CREATE_EVT => {
            let p = unsafe { &(*param).create };
            let svc_handle = p.service_handle;
            BLE_SVC_HANDLE.store(svc_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: service created (handle={})", svc_handle);
            unsafe {
                esp_ble_gatts_start_service(svc_handle);
                let mut char_uuid = uuid128_to_esp(CHAR_SWITCH);
                esp_ble_gatts_add_char(
                    svc_handle,
                    &mut char_uuid,
                    (ESP_GATT_PERM_READ | ESP_GATT_PERM_WRITE) as esp_gatt_perm_t,
                    (ESP_GATT_CHAR_PROP_BIT_READ | ESP_GATT_CHAR_PROP_BIT_WRITE)
                        as esp_gatt_char_prop_t,
                    core::ptr::null_mut(),
                    core::ptr::null_mut(),
                );
            }
        }
        esp_gatts_cb_event_t_ESP_GATTS_ADD_CHAR_EVT => {
            let p = unsafe { &(*param).add_char };
            BLE_SWITCH_CHAR_HANDLE.store(p.attr_handle as u32, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: switch char (handle={})", p.attr_handle);
            unsafe { restart_advertising() };
        }
        esp_gatts_cb_event_t_ESP_GATTS_CONNECT_EVT => {
            let p = unsafe { &(*param).connect };
            if let Ok(mut addr) = BLE_PEER_ADDR.lock() {
                addr.copy_from_slice(&p.remote_bda);
            }
            // A stale byte from the previous session must not leak into
            // the new one.
            BLE_PENDING_CMD.store(NO_PENDING, AtomicOrdering::Relaxed);
            BLE_CONNECTED.store(true, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: central connected (conn_id={})", p.conn_id);
        }
        esp_gatts_cb_event_t_ESP_GATTS_DISCONNECT_EVT => {
            BLE_CONNECTED.store(false, AtomicOrdering::Relaxed);
            BLE_PENDING_CMD.store(NO_PENDING, AtomicOrdering::Relaxed);
            log::info!("BLE GATTS: central disconnected");
            // Sequential sessions: advertise again for the next peer.
            unsafe { restart_advertising() };
        }
        esp_gatts_cb_event_t_ESP_GATTS_WRITE_EVT => {
            let p = unsafe { &(*param).write };
            let handle = p.handle as u32;
            if handle == BLE_SWITCH_CHAR_HANDLE.load(AtomicOrdering::Relaxed) && p.len >= 1 {
                let byte = unsafe { *p.value };
                BLE_PENDING_CMD.store(byte as u16, AtomicOrdering::Relaxed);
            }
        }
        _ => {}
    }
}

// ───────────────────────────────────────────────────────────────
// BLE adapter
// ───────────────────────────────────────────────────────────────

pub struct BleAdapter {
    state: BleState,
    device_name: heapless::String<24>,
    #[cfg(not(target_os = "espidf"))]
    sim_connected: bool,
    #[cfg(not(target_os = "espidf"))]
    sim_peer: PeerId,
    #[cfg(not(target_os = "espidf"))]
    sim_pending: Option<u8>,
}

impl BleAdapter {
    pub fn new(device_name: heapless::String<24>) -> Self {
        Self {
            state: BleState::Idle,
            device_name,
            #[cfg(not(target_os = "espidf"))]
            sim_connected: false,
            #[cfg(not(target_os = "espidf"))]
            sim_peer: PeerId::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_pending: None,
        }
    }

    pub fn state(&self) -> BleState {
        self.state
    }

    /// Bring up the stack and start advertising. Failure here is fatal
    /// to the surrounding process — there is nothing to control without
    /// a transport.
    pub fn start(&mut self) -> Result<()> {
        info!("BLE: starting, advertising as '{}'", self.device_name);
        self.platform_start()?;
        self.state = BleState::Advertising;
        Ok(())
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_start(&mut self) -> Result<()> {
        use esp_idf_svc::sys::*;
        unsafe {
            // Release classic BT memory (BLE-only mode saves ~30 KB).
            esp_bt_controller_mem_release(esp_bt_mode_t_ESP_BT_MODE_CLASSIC_BT);

            let mut bt_cfg = esp_bt_controller_config_t::default();
            if esp_bt_controller_init(&mut bt_cfg) != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(CommsError::BleInitFailed.into());
            }
            if esp_bt_controller_enable(esp_bt_mode_t_ESP_BT_MODE_BLE) != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(CommsError::BleInitFailed.into());
            }
            if esp_bluedroid_init() != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(CommsError::BleInitFailed.into());
            }
            if esp_bluedroid_enable() != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(CommsError::BleInitFailed.into());
            }

            esp_ble_gap_register_callback(Some(ble_gap_event_handler));
            esp_ble_gatts_register_callback(Some(ble_gatts_event_handler));
            if esp_ble_gatts_app_register(0) != ESP_OK as i32 {
                self.state = BleState::Failed;
                return Err(CommsError::GattRegisterFailed.into());
            }

            // Bluedroid wants a NUL-terminated name.
            let mut name = [0u8; 25];
            let bytes = self.device_name.as_bytes();
            name[..bytes.len()].copy_from_slice(bytes);
            esp_ble_gap_set_device_name(name.as_ptr() as *const _);

            // Advertising proper starts once the switch characteristic
            // is registered (ADD_CHAR event in the GATTS handler).
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    #[allow(clippy::unnecessary_wraps)]
    fn platform_start(&mut self) -> Result<()> {
        info!(
            "BLE(sim): advertising '{}' (service {:032x})",
            self.device_name, SERVICE_UUID
        );
        Ok(())
    }

    // ── Simulation controls (host-side tests) ─────────────────

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_connect(&mut self, peer: &str) {
        self.sim_peer = PeerId::new();
        let _ = self.sim_peer.push_str(peer);
        self.sim_pending = None;
        self.sim_connected = true;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn sim_disconnect(&mut self) {
        self.sim_connected = false;
        self.sim_pending = None;
    }

    /// Simulate a central writing the switch characteristic.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_write(&mut self, byte: u8) {
        self.sim_pending = Some(byte);
    }
}

// ───────────────────────────────────────────────────────────────
// TransportPort implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl TransportPort for BleAdapter {
    fn is_peer_connected(&self) -> bool {
        BLE_CONNECTED.load(AtomicOrdering::Relaxed)
    }

    fn peer_identifier(&self) -> PeerId {
        let mut id = PeerId::new();
        if let Ok(addr) = BLE_PEER_ADDR.lock() {
            let _ = write!(
                id,
                "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
                addr[0], addr[1], addr[2], addr[3], addr[4], addr[5]
            );
        }
        id
    }

    fn poll_command(&mut self) -> Option<u8> {
        let raw = BLE_PENDING_CMD.swap(NO_PENDING, AtomicOrdering::Relaxed);
        (raw != NO_PENDING).then_some(raw as u8)
    }
}

#[cfg(not(target_os = "espidf"))]
impl TransportPort for BleAdapter {
    fn is_peer_connected(&self) -> bool {
        self.sim_connected
    }

    fn peer_identifier(&self) -> PeerId {
        self.sim_peer.clone()
    }

    fn poll_command(&mut self) -> Option<u8> {
        self.sim_pending.take()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

//! Wireless debugging: connect, disconnect and pair over TCP
//!
//! Devices are kept on a fixed port ([`DEFAULT_WIFI_PORT`]) so the same
//! address keeps working across sessions.

use adx_core::prelude::*;

use crate::capture;
use crate::context::{pause, OpsContext};
use crate::runner::Adb;

/// Port adx moves every wireless device to
pub const DEFAULT_WIFI_PORT: u16 = 4444;

/// mDNS service name of auto-discovered TLS connections
const MDNS_TLS_SERVICE: &str = "_adb-tls-connect._tcp";

/// Split `IP` or `IP:PORT`; the port is `None` when not given
pub fn parse_ip_and_port(input: &str) -> Result<(String, Option<u16>)> {
    let parts: Vec<&str> = input.split(':').collect();
    match parts.as_slice() {
        [ip] => Ok((ip.to_string(), None)),
        [ip, port] => {
            let port: i64 = port
                .parse()
                .map_err(|_| Error::validation(format!("invalid port number: {port}")))?;
            if !(1..=65535).contains(&port) {
                return Err(Error::validation(format!("port number out of range: {port}")));
            }
            Ok((ip.to_string(), Some(port as u16)))
        }
        _ => Err(Error::validation(format!(
            "invalid IP address format: {input}"
        ))),
    }
}

/// `IP:PORT` with the default port filled in
pub fn normalize_address(input: &str) -> Result<String> {
    let (ip, port) = parse_ip_and_port(input)?;
    Ok(format!("{ip}:{}", port.unwrap_or(DEFAULT_WIFI_PORT)))
}

fn connected(adb: &Adb, address: &str) -> bool {
    match adb.output(None, &["connect", address]) {
        Ok(out) if out.success() && out.stdout.contains("connected to") => true,
        Ok(out) => {
            capture::err(format!("Connection rejected: {}", out.combined().trim()));
            false
        }
        Err(e) => {
            capture::err(format!("Connection command failed: {e}"));
            false
        }
    }
}

/// Connect to a device, moving it to the default port when needed
///
/// Returns the address the device ended up on.
pub fn connect(ctx: &OpsContext, input: &str) -> Result<String> {
    let (ip, port) = parse_ip_and_port(input)?;
    let port = port.unwrap_or(DEFAULT_WIFI_PORT);
    let address = format!("{ip}:{port}");

    capture::out(format!("Attempting to connect to {address}..."));
    if !connected(&ctx.adb, &address) {
        return Err(Error::operation(format!(
            "failed to connect to {address}. Device may need pairing first"
        )));
    }
    capture::out(format!("Successfully connected to {address}"));

    if port != DEFAULT_WIFI_PORT {
        if let Some(standard) = move_to_default_port(ctx, &ip, &address) {
            pause(ctx.delays.wifi_settle);
            return Ok(standard);
        }
    }

    cleanup_stale_connections(&ctx.adb);
    pause(ctx.delays.wifi_settle);
    Ok(address)
}

/// `tcpip 4444` then reconnect; `None` keeps the original connection
fn move_to_default_port(ctx: &OpsContext, ip: &str, address: &str) -> Option<String> {
    capture::out(format!(
        "Switching device to standard port {DEFAULT_WIFI_PORT}..."
    ));
    let port = DEFAULT_WIFI_PORT.to_string();
    if let Err(e) = ctx.adb.run(Some(address), &["tcpip", &port]) {
        capture::err(format!("Warning: failed to switch to standard port: {e}"));
        capture::out(format!("Device will remain on {address}"));
        return None;
    }

    pause(ctx.delays.tcpip_restart);

    let standard = format!("{ip}:{DEFAULT_WIFI_PORT}");
    capture::out(format!("Connecting to standard port {standard}..."));
    if !connected(&ctx.adb, &standard) {
        capture::err("Warning: failed to connect to standard port, keeping original connection");
        return None;
    }

    capture::out(format!("Successfully switched to standard port {standard}"));
    if let Err(e) = ctx.adb.run(None, &["disconnect", address]) {
        debug!("failed to drop temporary address {}: {}", address, e);
    }
    Some(standard)
}

/// Disconnect `IP[:PORT]`, returning the normalized address
pub fn disconnect(ctx: &OpsContext, input: &str) -> Result<String> {
    let address = normalize_address(input)?;
    capture::out(format!("Disconnecting from {address}..."));

    let out = ctx.adb.output(None, &["disconnect", &address])?;
    if !out.success() {
        if out.code == Some(1) {
            return Err(Error::operation(format!(
                "device {address} was not connected"
            )));
        }
        return Err(Error::operation(format!(
            "failed to disconnect from {address}: {}",
            out.combined().trim()
        )));
    }

    capture::out(format!("Disconnected from {address}"));
    cleanup_stale_connections(&ctx.adb);
    pause(ctx.delays.wifi_settle);
    Ok(address)
}

/// `adb pair ADDRESS CODE`
///
/// Pairing does not connect: the device listens on a different port for
/// debugging than for pairing.
pub fn pair(ctx: &OpsContext, address: &str, code: &str) -> Result<()> {
    capture::out(format!("Pairing with {address}..."));

    let output = ctx
        .adb
        .run(None, &["pair", address, code])
        .map_err(|e| Error::operation(format!("pairing command failed: {e}")))?;

    if !output.contains("Successfully paired") {
        return Err(Error::operation(format!(
            "pairing failed: {}",
            output.trim()
        )));
    }

    capture::out(format!("Successfully paired with {address}"));
    capture::out(format!(
        "Connect using the 'IP address & Port' shown on the phone; adx will move it to port {DEFAULT_WIFI_PORT}"
    ));
    cleanup_stale_connections(&ctx.adb);
    Ok(())
}

/// Serials of online mDNS TLS entries in `adb devices` output
pub fn stale_connections(devices_output: &str) -> Vec<String> {
    devices_output
        .lines()
        .map(str::trim)
        .filter(|line| line.contains(MDNS_TLS_SERVICE) && line.contains("device"))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let serial = fields.next()?;
            fields.next()?;
            Some(serial.to_string())
        })
        .collect()
}

/// Disconnect auto-discovered TLS entries that shadow the fixed-port one
pub fn cleanup_stale_connections(adb: &Adb) {
    let Ok(output) = adb.run(None, &["devices"]) else {
        return;
    };

    for serial in stale_connections(&output) {
        capture::out(format!("Cleaning up stale WiFi connection: {serial}"));
        if let Err(e) = adb.run(None, &["disconnect", &serial]) {
            debug!("failed to disconnect {}: {}", serial, e);
        }
    }
}

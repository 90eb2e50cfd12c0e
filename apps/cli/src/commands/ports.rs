//! 列出串口

use anyhow::Result;
use kobuki_sdk::serial::{PortKind, list_ports};

/// 列出系统中的串口
pub fn execute() -> Result<()> {
    let ports = list_ports()?;
    if ports.is_empty() {
        println!("(未发现串口)");
        return Ok(());
    }

    for port in ports {
        match port.kind {
            PortKind::Usb {
                vid,
                pid,
                serial_number,
                product,
                ..
            } => println!(
                "{}  usb {:04x}:{:04x}  {}  {}",
                port.name,
                vid,
                pid,
                product.as_deref().unwrap_or("-"),
                serial_number.as_deref().unwrap_or("-"),
            ),
            PortKind::Pci => println!("{}  pci", port.name),
            PortKind::Bluetooth => println!("{}  bluetooth", port.name),
            PortKind::Unknown => println!("{}  unknown", port.name),
        }
    }
    Ok(())
}

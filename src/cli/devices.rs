use tabled::Table;

use crate::{cli::report, jukebox::LiveJukebox, types::DeviceTableRow};

pub async fn devices(jukebox: &mut LiveJukebox) {
    match jukebox.devices().await {
        Ok(devices) => {
            let rows: Vec<DeviceTableRow> = devices.iter().map(DeviceTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => report(&e),
    }
}

// Accelink - Wi-Fi Link Bring-up
//
// Station mode, blocks until DHCP hands out an address. Credentials come from
// the build environment (see `PipelineConfig::from_build_env`).

use anyhow::anyhow;
use embedded_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use crate::config::PipelineConfig;

pub fn connect_wifi(
    modem: Modem,
    sysloop: EspSystemEventLoop,
    nvs: EspDefaultNvsPartition,
    cfg: &PipelineConfig,
) -> anyhow::Result<BlockingWifi<EspWifi<'static>>> {
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

    let auth_method = if cfg.wifi_pass.is_empty() {
        AuthMethod::None
    } else {
        AuthMethod::WPA2Personal
    };

    wifi.set_configuration(&Configuration::Client(ClientConfiguration {
        ssid: cfg
            .wifi_ssid
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("SSID {:?} is too long", cfg.wifi_ssid))?,
        password: cfg
            .wifi_pass
            .as_str()
            .try_into()
            .map_err(|_| anyhow!("Wi-Fi password is too long"))?,
        auth_method,
        ..Default::default()
    }))?;

    wifi.start()?;
    log::info!("Wi-Fi started, connecting to {:?}", cfg.wifi_ssid);

    wifi.connect()?;

    log::info!("Waiting for IP...");
    wifi.wait_netif_up()?;

    let ip_info = wifi.wifi().sta_netif().get_ip_info()?;
    log::info!("IP received: {}", ip_info.ip);

    Ok(wifi)
}

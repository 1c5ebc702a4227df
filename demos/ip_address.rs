//! Reverse geocode the IP address 8.8.8.8 (one of Google's DNS servers).

use std::net::IpAddr;

use freegeoip_client::GeoIpClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .init();

    // Substituted as the target only when neither IP nor domain is set
    let own_address: IpAddr = "127.0.0.1".parse()?;

    let mut client = GeoIpClient::try_new(own_address)?;
    client.set_ip_address("8.8.8.8").set_format("json");

    println!("--------------- JSON query -> decoded value ---------------");
    println!("{:#?}", client.lookup()?);

    println!("--------------- JSON query -> raw content ---------------");
    println!("{}", client.lookup_raw()?);

    client.set_format("xml");
    println!("--------------- XML query -> raw content ---------------");
    println!("{}", client.lookup_raw()?);

    Ok(())
}

//! Reverse geocode github.com, passed as a full URL whose host is
//! extracted by the client.

use std::net::IpAddr;

use freegeoip_client::GeoIpClient;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let own_address: IpAddr = "127.0.0.1".parse()?;

    let mut client = GeoIpClient::try_new(own_address)?;
    client
        .set_domain("http://github.com/test?test=3")
        .set_format("json");

    println!("--------------- JSON query -> decoded value ---------------");
    println!("{:#?}", client.lookup()?);

    println!("--------------- JSON query -> raw content ---------------");
    println!("{}", client.lookup_raw()?);

    client.set_format("xml");
    println!("--------------- XML query -> raw content ---------------");
    println!("{}", client.lookup_raw()?);

    Ok(())
}

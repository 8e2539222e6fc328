//! Command line and environment configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;
use url::Url;

#[derive(Debug, Clone, Parser)]
#[command(name = "blog-graphql-gateway", version, about = "GraphQL gateway for the blog REST service")]
pub struct Config {
    /// Base URL of the upstream REST service
    #[arg(long, env = "REST_SERVICE_URL", default_value = "http://localhost:3101")]
    pub rest_service_url: Url,

    /// Address to bind
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3100)]
    pub port: u16,
}

impl Config {
    pub fn listen_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

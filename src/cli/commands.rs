use clap::{Args, Subcommand};

use crate::{
    cli::{TargetError, UrlData, override_opt},
    constants::{DEFAULT_LIMIT, DEFAULT_LOCATION},
    model::{
        DnsQuery, HttpRequestOptions, Location, MeasurementOptions, MeasurementType,
        PostMeasurement,
    },
};

#[derive(Args, Debug, Clone)]
pub struct LocationArgs {
    /// Comma-separated list of locations to run from (continent, country, city, ASN, network...)
    #[arg(short = 'F', long, default_value = DEFAULT_LOCATION)]
    pub from: String,

    /// Maximum number of probes to use
    #[arg(short = 'L', long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

impl LocationArgs {
    fn locations(&self) -> Vec<Location> {
        self.from
            .split(',')
            .map(str::trim)
            .filter(|magic| !magic.is_empty())
            .map(Location::magic)
            .collect()
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run a ping measurement
    Ping {
        /// Hostname or IP address
        target: String,

        #[command(flatten)]
        location: LocationArgs,

        /// Number of packets to send
        #[arg(long)]
        packets: Option<u32>,
    },

    /// Run a traceroute measurement
    Traceroute {
        /// Hostname or IP address
        target: String,

        #[command(flatten)]
        location: LocationArgs,

        /// Protocol to use (ICMP, TCP, UDP)
        #[arg(long)]
        protocol: Option<String>,

        /// Destination port (TCP only)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Run a DNS lookup
    Dns {
        /// Domain name to resolve
        target: String,

        #[command(flatten)]
        location: LocationArgs,

        /// Record type to query (A, AAAA, CNAME, MX, NS, TXT...)
        #[arg(long)]
        query: Option<String>,

        /// Resolver to use instead of the probe's default
        #[arg(long)]
        resolver: Option<String>,

        /// Protocol to use (UDP, TCP)
        #[arg(long)]
        protocol: Option<String>,

        /// Resolver port
        #[arg(long)]
        port: Option<u16>,

        /// Trace delegation from the root servers
        #[arg(long)]
        trace: bool,
    },

    /// Run an MTR measurement
    Mtr {
        /// Hostname or IP address
        target: String,

        #[command(flatten)]
        location: LocationArgs,

        /// Protocol to use (ICMP, TCP, UDP)
        #[arg(long)]
        protocol: Option<String>,

        /// Destination port (TCP and UDP only)
        #[arg(long)]
        port: Option<u16>,

        /// Number of packets to send to each hop
        #[arg(long)]
        packets: Option<u32>,
    },

    /// Run an HTTP request
    Http {
        /// URL or hostname, e.g. https://cdn.jsdelivr.net/npm/react
        target: String,

        #[command(flatten)]
        location: LocationArgs,

        /// Host header, overrides the one from the URL
        #[arg(long)]
        host: Option<String>,

        /// Path, overrides the one from the URL
        #[arg(long)]
        path: Option<String>,

        /// Query string, overrides the one from the URL
        #[arg(long)]
        query: Option<String>,

        /// HTTP method (GET, HEAD)
        #[arg(long, default_value = "HEAD")]
        method: String,

        /// Protocol (HTTP, HTTPS, HTTP2), overrides the URL scheme
        #[arg(long)]
        protocol: Option<String>,

        /// Port, overrides the one from the URL
        #[arg(long)]
        port: Option<u16>,

        /// Resolver to use for the target hostname
        #[arg(long)]
        resolver: Option<String>,

        /// Extra request header as "Name: value", may be repeated
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,
    },
}

/// Parses a `Name: value` header argument.
fn parse_header(arg: &str) -> Result<(String, String), String> {
    let (name, value) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected \"Name: value\", got \"{arg}\""))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing header name in \"{arg}\""));
    }

    Ok((name.to_string(), value.trim().to_string()))
}

impl Commands {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Ping { .. } => "ping",
            Commands::Traceroute { .. } => "traceroute",
            Commands::Dns { .. } => "dns",
            Commands::Mtr { .. } => "mtr",
            Commands::Http { .. } => "http",
        }
    }

    /// Builds the API request for this command.
    pub fn to_request(&self) -> Result<PostMeasurement, TargetError> {
        let request = match self {
            Commands::Ping {
                target,
                location,
                packets,
            } => PostMeasurement {
                kind: MeasurementType::Ping,
                target: target.clone(),
                locations: location.locations(),
                limit: Some(location.limit),
                measurement_options: MeasurementOptions {
                    packets: *packets,
                    ..Default::default()
                },
                ..Default::default()
            },
            Commands::Traceroute {
                target,
                location,
                protocol,
                port,
            } => PostMeasurement {
                kind: MeasurementType::Traceroute,
                target: target.clone(),
                locations: location.locations(),
                limit: Some(location.limit),
                measurement_options: MeasurementOptions {
                    protocol: protocol.clone(),
                    port: *port,
                    ..Default::default()
                },
                ..Default::default()
            },
            Commands::Dns {
                target,
                location,
                query,
                resolver,
                protocol,
                port,
                trace,
            } => PostMeasurement {
                kind: MeasurementType::Dns,
                target: target.clone(),
                locations: location.locations(),
                limit: Some(location.limit),
                measurement_options: MeasurementOptions {
                    query: query.clone().map(|kind| DnsQuery { kind }),
                    resolver: resolver.clone(),
                    protocol: protocol.clone(),
                    port: *port,
                    trace: trace.then_some(true),
                    ..Default::default()
                },
                ..Default::default()
            },
            Commands::Mtr {
                target,
                location,
                protocol,
                port,
                packets,
            } => PostMeasurement {
                kind: MeasurementType::Mtr,
                target: target.clone(),
                locations: location.locations(),
                limit: Some(location.limit),
                measurement_options: MeasurementOptions {
                    protocol: protocol.clone(),
                    port: *port,
                    packets: *packets,
                    ..Default::default()
                },
                ..Default::default()
            },
            Commands::Http {
                target,
                location,
                host,
                path,
                query,
                method,
                protocol,
                port,
                resolver,
                headers,
            } => {
                let url = UrlData::parse(target)?;
                let protocol = override_opt(
                    url.protocol.to_uppercase(),
                    protocol.clone().unwrap_or_default(),
                );

                PostMeasurement {
                    kind: MeasurementType::Http,
                    target: url.host,
                    locations: location.locations(),
                    limit: Some(location.limit),
                    measurement_options: MeasurementOptions {
                        protocol: Some(protocol),
                        port: override_opt(url.port, *port),
                        resolver: resolver.clone(),
                        request: Some(HttpRequestOptions {
                            host: host.clone().unwrap_or_default(),
                            path: override_opt(url.path, path.clone().unwrap_or_default()),
                            query: override_opt(url.query, query.clone().unwrap_or_default()),
                            method: method.to_uppercase(),
                            headers: headers.iter().cloned().collect(),
                        }),
                        ..Default::default()
                    },
                    ..Default::default()
                }
            }
        };

        Ok(request)
    }
}

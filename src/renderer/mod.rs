use std::fmt::{self, Display, Formatter};

use colored::Colorize as _;

use crate::model::{Measurement, MeasurementType, ProbeMeta, ProbeResult, Rtt, Timings};

/// Terminal rendering of a finished measurement.
pub struct MeasurementOutput<'a> {
    pub measurement: &'a Measurement,
    /// Print timing summaries instead of the raw probe output
    pub latency: bool,
}

/// `> NA, US, (TX), Dallas, ASN:7794, Network` style probe header.
pub fn probe_header(probe: &ProbeMeta) -> String {
    let mut parts = vec![probe.continent.clone(), probe.country.clone()];
    if !probe.state.is_empty() {
        parts.push(format!("({})", probe.state));
    }
    parts.push(probe.city.clone());
    parts.push(format!("ASN:{}", probe.asn));
    parts.push(probe.network.clone());

    format!("> {}", parts.join(", "))
}

impl Display for MeasurementOutput<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, result) in self.measurement.results.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "{}", probe_header(&result.probe).bright_cyan().bold())?;

            if self.latency {
                write_latency(f, self.measurement.kind, result)?;
            } else {
                writeln!(f, "{}", result.result.raw_output.trim_end())?;
            }
        }

        Ok(())
    }
}

fn write_latency(f: &mut Formatter<'_>, kind: MeasurementType, result: &ProbeResult) -> fmt::Result {
    let data = &result.result;

    match kind {
        MeasurementType::Ping => {
            for name in ["min", "max", "avg"] {
                if let Some(value) = data.stats.get(name) {
                    writeln!(f, "  {}: {:.2} ms", name.to_title_case(), value)?;
                }
            }
            if let Some(loss) = data.stats.get("loss") {
                writeln!(f, "  Loss: {loss}%")?;
            }
        }
        MeasurementType::Traceroute | MeasurementType::Mtr => {
            writeln!(f, "  Hops: {}", data.hops.len())?;
            if let Some(last) = data.hops.last() {
                let rtts: Vec<String> = last.timings.iter().map(format_rtt).collect();
                writeln!(f, "  Last hop: {} {}", last.resolved_address, rtts.join(" "))?;
            }
        }
        MeasurementType::Dns | MeasurementType::Http | MeasurementType::Unknown => {
            match data.timings(kind) {
                Ok(timings) => write_timings(f, &timings)?,
                Err(e) => writeln!(f, "  {}", e.to_string().red())?,
            }
        }
    }

    Ok(())
}

fn write_timings(f: &mut Formatter<'_>, timings: &Timings) -> fmt::Result {
    match timings {
        Timings::Sequence(rtts) => {
            for rtt in rtts {
                writeln!(f, "  {}", format_rtt(rtt))?;
            }
        }
        Timings::Mapping(map) => {
            // Total first, the phases after it.
            if let Some(total) = map.get("total") {
                writeln!(f, "  Total: {total} ms")?;
            }
            for (name, value) in map.iter().filter(|(name, _)| *name != "total") {
                writeln!(f, "  {}: {value} ms", name.to_title_case())?;
            }
        }
    }

    Ok(())
}

fn format_rtt(rtt: &Rtt) -> String {
    match rtt.rtt {
        Some(rtt) => format!("{rtt:.2} ms"),
        None => "*".to_string(),
    }
}

trait ToTitleCase {
    fn to_title_case(&self) -> String;
}

impl ToTitleCase for str {
    fn to_title_case(&self) -> String {
        let mut chars = self.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().chain(chars).collect(),
        }
    }
}

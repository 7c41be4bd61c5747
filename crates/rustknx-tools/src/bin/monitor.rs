use clap::Parser;
use rustknx_core::dpt::{DptId, DptXlator, DptXlatorFactory};
use rustknx_core::{GroupAddress, IndividualAddress};
use rustknx_datalink::UdpTransceiver;
use rustknx_stack::{GroupListener, Stack, StackError};
use serde_json::json;
use std::net::SocketAddrV4;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "knx-monitor", about = "Print group traffic for subscribed addresses")]
struct Args {
    /// Group address to watch; repeat for several.
    #[arg(long, required = true)]
    gad: Vec<GroupAddress>,
    /// Decode payloads with this datapoint type, e.g. 9.001.
    #[arg(long)]
    dpt: Option<DptId>,
    /// Individual address of the monitor itself.
    #[arg(long, default_value = "1.0.254")]
    from: IndividualAddress,
    /// KNXnet/IP routing multicast group.
    #[arg(long, default_value = "224.0.23.12:3671")]
    multicast: SocketAddrV4,
    /// Emit one JSON object per line instead of plain text.
    #[arg(long)]
    json: bool,
}

struct Printer {
    gad: GroupAddress,
    xlator: Option<Box<dyn DptXlator>>,
    json: bool,
}

impl Printer {
    fn report(&self, source: IndividualAddress, service: &str, data: Option<&[u8]>) {
        let decoded = match (&self.xlator, data) {
            (Some(x), Some(frame)) => x
                .frame_to_data(frame)
                .and_then(|d| x.data_to_value(d))
                .ok()
                .map(|v| v.to_string()),
            _ => None,
        };
        if self.json {
            let line = json!({
                "service": service,
                "source": source.to_string(),
                "gad": self.gad.to_string(),
                "data": data.map(hex),
                "value": decoded,
            });
            println!("{line}");
        } else {
            let mut text = format!("{service} {} -> {}", source, self.gad);
            if let Some(data) = data {
                text.push_str(&format!(" [{}]", hex(data)));
            }
            if let Some(value) = decoded {
                text.push_str(&format!(" = {value}"));
            }
            println!("{text}");
        }
    }
}

fn hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

impl GroupListener for Printer {
    fn on_write(&self, source: IndividualAddress, data: &[u8]) -> Result<(), StackError> {
        self.report(source, "write", Some(data));
        Ok(())
    }
    fn on_read(&self, source: IndividualAddress) -> Result<(), StackError> {
        self.report(source, "read", None);
        Ok(())
    }
    fn on_response(&self, source: IndividualAddress, data: &[u8]) -> Result<(), StackError> {
        self.report(source, "response", Some(data));
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let transceiver = UdpTransceiver::multicast(args.multicast)?;
    let stack = Stack::new(args.from, Arc::new(transceiver))?;
    for gad in &args.gad {
        let xlator = match args.dpt {
            Some(dpt) => Some(DptXlatorFactory::create(dpt)?),
            None => None,
        };
        stack.application().subscribe(
            *gad,
            Arc::new(Printer {
                gad: *gad,
                xlator,
                json: args.json,
            }),
        )?;
    }
    stack.start()?;

    eprintln!("monitoring {} group(s), Ctrl+C to stop", args.gad.len());
    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}

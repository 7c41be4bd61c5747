use clap::Parser;
use rustknx_core::dpt::{DptId, DptXlator, DptXlatorFactory};
use rustknx_core::{GroupAddress, IndividualAddress, Priority};
use rustknx_datalink::UdpTransceiver;
use rustknx_stack::{GroupListener, Stack, StackError};
use std::net::SocketAddrV4;
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "knx-groupread", about = "Send an A_GroupValue_Read and wait for the answer")]
struct Args {
    /// Group address to read, e.g. 1/1/1.
    #[arg(long)]
    gad: GroupAddress,
    /// Datapoint type used to decode the answer, e.g. 9.001.
    #[arg(long)]
    dpt: DptId,
    /// Individual address to send from.
    #[arg(long, default_value = "1.0.254")]
    from: IndividualAddress,
    #[arg(long, default_value = "low")]
    priority: Priority,
    /// Seconds to wait for a response.
    #[arg(long, default_value_t = 3)]
    timeout: u64,
    /// KNXnet/IP routing multicast group.
    #[arg(long, default_value = "224.0.23.12:3671")]
    multicast: SocketAddrV4,
}

struct ResponseCatcher(Mutex<mpsc::Sender<(IndividualAddress, Vec<u8>)>>);

impl GroupListener for ResponseCatcher {
    fn on_write(&self, _source: IndividualAddress, _data: &[u8]) -> Result<(), StackError> {
        Ok(())
    }
    fn on_read(&self, _source: IndividualAddress) -> Result<(), StackError> {
        Ok(())
    }
    fn on_response(&self, source: IndividualAddress, data: &[u8]) -> Result<(), StackError> {
        let tx = self.0.lock().unwrap_or_else(|e| e.into_inner());
        let _ = tx.send((source, data.to_vec()));
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let xlator = DptXlatorFactory::create(args.dpt)?;
    let transceiver = UdpTransceiver::multicast(args.multicast)?;
    let stack = Stack::new(args.from, Arc::new(transceiver))?;

    let (tx, rx) = mpsc::channel();
    let group = stack
        .application()
        .subscribe(args.gad, Arc::new(ResponseCatcher(Mutex::new(tx))))?;
    stack.start()?;
    group.read(args.priority)?;

    let result = rx.recv_timeout(Duration::from_secs(args.timeout));
    stack.stop();

    match result {
        Ok((source, frame)) => {
            let data = xlator.frame_to_data(&frame)?;
            let value = xlator.data_to_value(data)?;
            match xlator.unit() {
                Some(unit) => println!("{} = {value} {unit} (from {source})", args.gad),
                None => println!("{} = {value} (from {source})", args.gad),
            }
            Ok(())
        }
        Err(_) => {
            eprintln!("no response for {} within {}s", args.gad, args.timeout);
            std::process::exit(1);
        }
    }
}

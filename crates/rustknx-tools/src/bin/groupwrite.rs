use clap::Parser;
use rustknx_core::dpt::{DptId, DptXlator, DptXlatorFactory};
use rustknx_core::{GroupAddress, IndividualAddress, Priority};
use rustknx_datalink::UdpTransceiver;
use rustknx_stack::Stack;
use rustknx_tools::{parse_value, SilentListener};
use std::net::SocketAddrV4;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "knx-groupwrite", about = "Send an A_GroupValue_Write")]
struct Args {
    /// Group address to write to, e.g. 1/1/1.
    #[arg(long)]
    gad: GroupAddress,
    /// Datapoint type of the value, e.g. 9.001.
    #[arg(long)]
    dpt: DptId,
    /// Individual address to send from.
    #[arg(long, default_value = "1.0.254")]
    from: IndividualAddress,
    #[arg(long, default_value = "low")]
    priority: Priority,
    /// KNXnet/IP routing multicast group.
    #[arg(long, default_value = "224.0.23.12:3671")]
    multicast: SocketAddrV4,
    /// The value, in the DPT's unit (e.g. `on`, `42`, `21.5`).
    value: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let xlator = DptXlatorFactory::create(args.dpt)?;
    let value = parse_value(&*xlator, &args.value)?;
    let data = xlator.value_to_data(&value)?;
    let frame = xlator.data_to_frame(data)?;

    let transceiver = UdpTransceiver::multicast(args.multicast)?;
    let stack = Stack::new(args.from, Arc::new(transceiver))?;
    let group = stack
        .application()
        .subscribe(args.gad, Arc::new(SilentListener))?;
    stack.start()?;

    group.write(args.priority, &frame, xlator.type_size())?;
    println!("{} <- {value}", args.gad);

    // stop() drains the send queue before joining the pumps.
    stack.stop();
    Ok(())
}

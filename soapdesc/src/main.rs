use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, Write},
    path::PathBuf,
};

use serde::Serialize;
use structopt::StructOpt;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use soapdesc_wsdl::{
    self as wsdl,
    namespaces::SoapVersion,
    types::{BindingOperation, Type},
};

#[derive(Debug, Error)]
enum Error {
    #[error("Error parsing WSDL")]
    ParseError(#[from] wsdl::Error),

    #[error("Error writing description")]
    IoError(#[from] std::io::Error),

    #[error("Error serializing description")]
    JsonError(#[from] serde_json::Error),
}

#[derive(StructOpt)]
struct Args {
    /// Write the description here instead of stdout
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Emit single-line JSON
    #[structopt(long)]
    compact: bool,

    /// Path or URL of the WSDL document
    input: String,
}

#[derive(Serialize)]
struct Description<'a> {
    endpoint: &'a str,
    soap_version: SoapVersion,
    types: &'a BTreeMap<String, Type>,
    operations: &'a BTreeMap<String, BindingOperation>,
}

fn write_description<W: Write>(
    writer: W,
    description: &Description<'_>,
    compact: bool,
) -> Result<(), Error> {
    if compact {
        serde_json::to_writer(writer, description)?;
    } else {
        serde_json::to_writer_pretty(writer, description)?;
    }

    Ok(())
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("soapdesc=info,soapdesc_wsdl=info")),
        )
        .with_writer(io::stderr)
        .init();

    let definition = wsdl::parse(&args.input)?;
    tracing::info!(
        input = %args.input,
        operations = definition.operations().len(),
        "extracted service description"
    );

    let description = Description {
        endpoint: definition.endpoint(),
        soap_version: definition.soap_version(),
        types: definition.types(),
        operations: definition.operations(),
    };

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            write_description(&mut file, &description, args.compact)?;
            writeln!(&mut file)?;
        }

        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_description(&mut handle, &description, args.compact)?;
            writeln!(&mut handle)?;
        }
    }

    Ok(())
}

//! `formats` command

use crate::exit_codes;
use anyhow::Result;
use imgpress_cli::output::print_formats;
use imgpress_engine::Compressor;

pub fn run(compressor: &Compressor, json: bool) -> Result<i32> {
    let formats = compressor.supported_formats();

    if json {
        println!("{}", serde_json::to_string_pretty(&formats)?);
    } else {
        print_formats(&formats);
    }

    Ok(exit_codes::SUCCESS)
}

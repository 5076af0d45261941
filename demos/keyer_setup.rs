// SPDX-FileCopyrightText: The cwkeyer authors
// SPDX-License-Identifier: MPL-2.0

use std::{env, thread, time::Duration};

use cwkeyer::{
    midi::midir::{input_port_names, output_port_names},
    RegisterWrite, Session, SessionConfig,
};

fn main() {
    pretty_env_logger::init();
    match run() {
        Ok(()) => (),
        Err(err) => println!("Error: {err}"),
    }
}

fn run() -> anyhow::Result<()> {
    println!("Output ports: {:?}", output_port_names()?);
    println!("Input ports: {:?}", input_port_names()?);

    let mut config = SessionConfig::default();
    if let Some(port_name) = env::args().nth(1) {
        config.send_port_name.clone_from(&port_name);
        config.receive_port_name = port_name;
    }
    let session = Session::connect(config)?;

    let decoder = session.nrpn_decoder(|ts, reply| {
        if reply.is_keyer_id() {
            println!("{ts}: Found CW keyer");
        } else {
            println!("{ts}: {reply:?}");
        }
    });
    let input = session.listen(decoder)?;
    session.query_keyer_id()?;
    session.query_version()?;

    session.master_volume(0.5)?;
    session.sidetone_volume(0.3)?;
    session.sidetone_frequency(700)?;
    session.cw_speed(22)?;
    session.keyer_autoptt(true)?;
    session.wm8960_enable(true)?;
    session.wm8960_headphone_volume(0.8, None)?;
    session.wm8960_headphone_power(true, true)?;
    // Left headphone output volume, updated immediately
    session.raw_write(RegisterWrite::new(0x02, 0x179).forced())?;

    // Wait for replies
    thread::sleep(Duration::from_millis(500));
    input.close();
    Ok(())
}

extern crate darc_space;
use darc_space::msg_builder::SendInput;
use darc_space::{Account, BroadcastMode, BroadcastRequest, ChainConfig, Coin, MsgInput, TxBuilder};
use std::fs::File;
use std::io::Write;

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let config = ChainConfig::default();
    let builder = TxBuilder::new(config.clone(), Default::default());

    let mut account = Account::recover(&config, PHRASE)?;
    // Print some diagnostics
    println!("Address: {}", account.address());
    println!("Public key: {}", account.public_key_bech32()?);

    let send = builder.build_msg(MsgInput::Send(SendInput {
        from: account.address(),
        to: "darc1nx7vqq8hsy8chwe27mcr4cmazdwus7zjqtepzk".parse()?,
        amount: Coin::new(100u32.into(), "darc".to_string()),
    }))?;

    account.update_info(7, 1);
    let tx = account.sign(&builder, vec![send], "")?;
    let request = BroadcastRequest::new(tx, BroadcastMode::Sync);

    let mut file = File::create("signed_msg.json")?;

    let s = serde_json::to_string_pretty(&request.to_envelope_json()?)?;
    file.write_all(s.as_bytes())?;

    println!("{}", s);

    Ok(())
}

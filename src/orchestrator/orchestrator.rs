use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

use csv::{ReaderBuilder, Writer};
use log::{info, warn};

use crate::config::MixerConfig;
use crate::engine::Mixer;
use crate::error::MixerError;
use crate::ledger::DepositKey;
use crate::transactions::{CommandError, CommandRecord, CommandType};
use crate::workers::Workers;

/// Replay a command script against a fresh mixer while both workers run, then print the
/// final balances to stdout.
pub fn run(filename: &str, config: &MixerConfig) -> Result<(), Box<dyn Error>> {
    let file = File::open(filename)?;
    let mut rdr: csv::Reader<File> = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);

    let mixer = Mixer::new(config);
    let workers = Workers::start(&mixer, config)?;
    let mut stdout = io::stdout();

    for result in rdr.deserialize() {
        let record: CommandRecord = result?;
        match execute(&mixer, &record, &mut stdout) {
            Ok(()) => {}
            Err(CommandError::Output(e)) => return Err(e.into()),
            Err(e) => warn!("rejected {:?}: {}", record.command, e),
        }
    }

    workers.shutdown();
    info!("script finished, {} coins minted", mixer.minted());
    mixer.write_balances(stdout)?;
    Ok(())
}

/// Apply a single command. Display commands write CSV to `out`.
pub fn execute<W: Write>(
    mixer: &Mixer,
    record: &CommandRecord,
    out: &mut W,
) -> Result<(), CommandError> {
    match record.command {
        CommandType::CreateUser => {
            mixer.create_user(record.user()?)?;
        }
        CommandType::Mint => {
            let user = mixer.user(record.user()?)?;
            mixer.mint(&user, record.amount()?)?;
        }
        CommandType::OpenDeposit => {
            let user = mixer.user(record.user()?)?;
            let key = mixer.open_deposit(&user, &record.aliases()?, record.amount()?)?;
            info!("{} can deposit to {}", user.name(), key);
        }
        CommandType::Deposit => {
            let user = mixer.user(record.user()?)?;
            let key = DepositKey::from_aliases(record.aliases()?)?;
            let wanted = record.amount()?;
            let moved = mixer.deposit(&user, &key, wanted)?;
            if moved < wanted {
                warn!("{} only held {} of {} coins", user.name(), moved, wanted);
            }
        }
        CommandType::Wait => {
            thread::sleep(Duration::from_millis(record.amount()?));
        }
        CommandType::Inspect => {
            let account = record.args()?;
            let coins = mixer
                .inspect(account)
                .ok_or_else(|| MixerError::UnknownAccount(account.to_string()))?;

            let mut wtr = Writer::from_writer(&mut *out);
            wtr.write_record(["account", "coin", "history"])?;
            for (id, history) in coins {
                let trail: Vec<String> = history.iter().map(ToString::to_string).collect();
                wtr.serialize((account, id, trail.join(" > ")))?;
            }
            wtr.flush().map_err(csv::Error::from)?;
        }
        CommandType::Balances => {
            mixer.write_balances(&mut *out)?;
        }
    }
    Ok(())
}

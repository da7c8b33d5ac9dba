//! Pre-generation hook binary. Invoked by the template renderer with the
//! generation payload piped to stdin. Exits with success even on failure so
//! a display problem never blocks generation.

use visionbake::context::HookPayload;
use visionbake::hooks::pre_gen;
use visionbake::logger::init_logger;
use visionbake::prompt::DialoguerPrompter;

fn main() {
    init_logger(false);

    let prompter = DialoguerPrompter::new();
    let mut stdout = std::io::stdout().lock();
    let result = HookPayload::from_reader(std::io::stdin())
        .and_then(|payload| pre_gen::run(&mut stdout, &payload, &prompter));

    if let Err(e) = result {
        log::warn!("Could not display the welcome message: {}", e);
    }
}

//! Post-generation hook binary. Finalizes the generated project tree.
//! The only fatal path is the user declining the configuration summary;
//! every other failure degrades to a warning.

use visionbake::context::HookPayload;
use visionbake::error::{default_error_handler, Error};
use visionbake::hooks::post_gen;
use visionbake::logger::init_logger;
use visionbake::prompt::DialoguerPrompter;

fn main() {
    init_logger(false);

    let prompter = DialoguerPrompter::new();
    let result = HookPayload::from_reader(std::io::stdin())
        .and_then(|payload| post_gen::run(&payload, &prompter));

    match result {
        Ok(()) => {}
        Err(err @ Error::Declined) => default_error_handler(err),
        Err(err) => log::warn!("Post-generation step failed: {}", err),
    }
}

//! B-Side Nexus entrypoint.

use bside_nexus::run;
use bside_nexus::ui::messages::report;

fn main() {
    if let Err(e) = run() {
        report(&e);
        std::process::exit(1);
    }
}

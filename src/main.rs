use petriscope::ui::output;

fn main() {
    if let Err(err) = petriscope::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}

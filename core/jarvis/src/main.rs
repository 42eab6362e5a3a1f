use std::process;

fn main() {
    // .env は任意。無ければ環境変数のみを使う
    let _ = dotenvy::dotenv();

    let exit_code = match jarvis::run() {
        Ok(code) => code,
        Err(e) => {
            if e.is_usage() {
                jarvis::print_usage();
            }
            eprintln!("jarvis: {}", e);
            e.exit_code()
        }
    };
    process::exit(exit_code);
}

// ABOUTME: Entry point for the Sakila Charts command-line tool
// ABOUTME: Calls the library run function and turns errors into a non-zero exit

fn main() -> anyhow::Result<()> {
    sakila_charts_lib::run()
}

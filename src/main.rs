use permafrost::driver::protocol;
use permafrost::movegen::magic::init_attack_tables;

fn main() -> anyhow::Result<()> {
    init_attack_tables();
    protocol::run()
}

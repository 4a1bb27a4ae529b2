use fullmoon::{IsFullMoon, LunarConfig, NextFullMoon};

fn main() -> fullmoon::Result<()> {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .try_init();

    // Successive full moons from now
    let mut moons = NextFullMoon::new();
    println!("{}", moons.advance()?);
    println!("{}", moons.advance()?);

    // Back to now
    println!("{}", moons.reset().advance()?);
    println!("{}", moons.advance()?);

    // From a fixed origin
    println!("{}", moons.set_origin_date_string("1998-07-12")?.advance()?);
    println!("{}", moons.advance()?);
    moons.reset();
    println!("{}", moons.advance()?);

    // The same origin with the historical arithmetic
    let mut legacy = NextFullMoon::with_config(LunarConfig::legacy());
    println!("{}", legacy.set_origin_date_string("1998-07-12")?.advance()?);

    println!("{}", moons.set_origin_now().advance()?);
    println!("{} searches", moons.call_count());

    let mut day = IsFullMoon::new();
    println!("{}", day.is_full_moon()?);
    println!(
        "{}",
        day.set_date_string_with_format("12/07/1992", "%d/%m/%Y")?
            .is_full_moon()?
    );

    for event in day.phase_events()? {
        println!("{} at {}", event.phase, event.time);
    }

    // Outside JD 0 .. 10000-01-01 the phase tables are not evaluated
    let far = NextFullMoon::new().set_origin(300_000_000_000).advance();
    println!("{far:?}");

    Ok(())
}

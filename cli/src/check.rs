use anyhow::Result;
use pincrack_core::cpu;

use crate::Check as CheckArgs;

/// Checks a single number on the CPU and prints a verdict breakdown.
pub fn check(args: CheckArgs) -> Result<()> {
    let mut digits = [0u8; 10];
    for (slot, c) in digits.iter_mut().zip(args.number.bytes()) {
        *slot = c - b'0';
    }

    let date = cpu::date_valid(&digits);
    let luhn = cpu::luhn_valid(&digits);

    println!("number   {}", args.number);
    println!("date     {}", if date { "ok" } else { "invalid" });
    println!("checksum {}", if luhn { "ok" } else { "invalid" });
    println!("verdict  {}", if date && luhn { "valid" } else { "invalid" });

    Ok(())
}

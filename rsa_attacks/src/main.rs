use std::error::Error;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use num_bigint::BigUint;
use rand::rngs::OsRng;

use rsa_attacks::attacks::{FermatAttack, WienerAttack};
use rsa_attacks::primality::PrimalityTestKind;
use rsa_attacks::rsa::{KeyGeneratorConfig, PrivateKey, PublicKey, RsaService, Vulnerability};
use rsa_attacks::{KeyKind, RsaError};

#[derive(Parser)]
#[command(
    name = "rsa_attacks",
    about = "RSA key generation and the Fermat / Wiener attacks on weak keys"
)]
struct Cli {
    /// What to run; asks interactively when omitted
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Modulus size in bits (even, >= 16)
    #[arg(long, global = true)]
    bits: Option<u64>,

    /// Primality test used for key generation
    #[arg(long, value_enum, global = true)]
    test: Option<TestArg>,

    /// Minimum probability that accepted primes are prime
    #[arg(long, global = true)]
    probability: Option<f64>,

    /// Plaintext to encrypt (decimal)
    #[arg(long, global = true, value_parser = parse_biguint)]
    message: Option<BigUint>,
}

#[derive(Subcommand, Clone, Copy, Debug)]
enum Mode {
    /// Generate a key pair and encrypt/decrypt a message
    Roundtrip,
    /// Generate a key with close factors and break it with Fermat's method
    Fermat,
    /// Generate a key with a small private exponent and break it with Wiener's attack
    Wiener,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum TestArg {
    Fermat,
    SolovayStrassen,
    MillerRabin,
}

impl From<TestArg> for PrimalityTestKind {
    fn from(arg: TestArg) -> Self {
        match arg {
            TestArg::Fermat => PrimalityTestKind::Fermat,
            TestArg::SolovayStrassen => PrimalityTestKind::SolovayStrassen,
            TestArg::MillerRabin => PrimalityTestKind::MillerRabin,
        }
    }
}

/// Fixed parameters of each mode; command line flags override them.
struct ModeDefaults {
    bits: u64,
    vulnerability: Vulnerability,
    message: u64,
}

impl Mode {
    fn defaults(self) -> ModeDefaults {
        match self {
            Mode::Roundtrip => ModeDefaults {
                bits: 1024,
                vulnerability: Vulnerability::None,
                message: 123_490,
            },
            Mode::Fermat => ModeDefaults {
                bits: 64,
                vulnerability: Vulnerability::CloseFactors,
                message: 12_345,
            },
            Mode::Wiener => ModeDefaults {
                bits: 512,
                vulnerability: Vulnerability::SmallPrivateExponent,
                message: 123_456_789,
            },
        }
    }
}

fn parse_biguint(s: &str) -> Result<BigUint, String> {
    s.parse::<BigUint>().map_err(|e| e.to_string())
}

fn prompt_mode() -> io::Result<Option<Mode>> {
    println!("Select a mode: RSA round trip (1), Fermat attack (2), Wiener attack (3):");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(match input.trim() {
        "1" => Some(Mode::Roundtrip),
        "2" => Some(Mode::Fermat),
        "3" => Some(Mode::Wiener),
        _ => None,
    })
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mode = match cli.mode {
        Some(mode) => mode,
        None => match prompt_mode() {
            Ok(Some(mode)) => mode,
            Ok(None) => {
                eprintln!("Unknown mode, expected 1, 2 or 3");
                return ExitCode::FAILURE;
            }
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    match run(mode, &cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(mode: Mode, cli: &Cli) -> Result<(), Box<dyn Error>> {
    let defaults = mode.defaults();
    let config = KeyGeneratorConfig::new(
        cli.test.map_or(PrimalityTestKind::MillerRabin, Into::into),
        cli.probability.unwrap_or(0.99),
        cli.bits.unwrap_or(defaults.bits),
        defaults.vulnerability,
    )?;
    let message = cli
        .message
        .clone()
        .unwrap_or_else(|| BigUint::from(defaults.message));

    let mut service = RsaService::new(config);
    println!(
        "Generating {}-bit keys ({:?})...",
        service.config().bit_length(),
        service.config().vulnerability()
    );
    service.generate_keys(&mut OsRng)?;

    let public_key = service
        .public_key()
        .ok_or(RsaError::UninitializedKey(KeyKind::Public))?
        .clone();
    let private_key = service
        .private_key()
        .ok_or(RsaError::UninitializedKey(KeyKind::Private))?
        .clone();
    println!("Keys generated:");
    println!("  N = {}", public_key.n);
    println!("  e = {}", public_key.e);
    println!("  d = {}", private_key.d);

    match mode {
        Mode::Roundtrip => run_roundtrip(&service, &message),
        Mode::Fermat => run_fermat(&service, &public_key, &private_key, &message),
        Mode::Wiener => run_wiener(&service, &public_key, &private_key, &message),
    }
}

fn run_roundtrip(service: &RsaService, message: &BigUint) -> Result<(), Box<dyn Error>> {
    println!("Original message:  {message}");
    let ciphertext = service.encrypt(message)?;
    println!("Ciphertext:        {ciphertext}");
    let decrypted = service.decrypt(&ciphertext)?;
    println!("Decrypted message: {decrypted}");

    if &decrypted == message {
        println!("Round trip succeeded.");
    } else {
        println!("Round trip FAILED: decrypted message differs from the original.");
    }
    Ok(())
}

fn run_fermat(
    service: &RsaService,
    public_key: &PublicKey,
    private_key: &PrivateKey,
    message: &BigUint,
) -> Result<(), Box<dyn Error>> {
    println!("Running Fermat attack...");
    let result = FermatAttack::new().attack(public_key)?;
    println!("Attack succeeded:");
    println!("  p = {}, q = {}", result.p, result.q);
    println!("  phi(N) = {}", result.phi);
    println!("  recovered d = {}", result.d);

    report_recovered(service, public_key, private_key, &result.d, message)
}

fn run_wiener(
    service: &RsaService,
    public_key: &PublicKey,
    private_key: &PrivateKey,
    message: &BigUint,
) -> Result<(), Box<dyn Error>> {
    println!("Running Wiener attack...");
    let result = match WienerAttack::attack(public_key) {
        Ok(result) => result,
        Err(failure) => {
            println!("Convergents examined (k/d):");
            for c in &failure.convergents {
                println!("  k = {}, d = {}", c.k, c.d);
            }
            return Err(failure.into());
        }
    };

    println!("Attack succeeded:");
    println!("  recovered d = {}", result.d);
    println!("  phi(N) = {}", result.phi);
    println!("Convergents (k/d):");
    for c in &result.convergents {
        println!("  k = {}, d = {}", c.k, c.d);
    }

    report_recovered(service, public_key, private_key, &result.d, message)
}

/// Compares a recovered exponent with the real one and decrypts with it.
fn report_recovered(
    service: &RsaService,
    public_key: &PublicKey,
    private_key: &PrivateKey,
    recovered_d: &BigUint,
    message: &BigUint,
) -> Result<(), Box<dyn Error>> {
    if recovered_d == &private_key.d {
        println!("Recovered d matches the generated private exponent.");
    } else {
        println!("Recovered d differs from the generated private exponent.");
    }

    let ciphertext = service.encrypt(message)?;
    let forged = PrivateKey::new(public_key.n.clone(), recovered_d.clone());
    let decrypted = forged.decrypt(&ciphertext)?;
    println!("Message decrypted with recovered d: {decrypted}");

    if &decrypted == message {
        println!("Decryption with the recovered d succeeded.");
    } else {
        println!("Decryption with the recovered d failed.");
    }
    Ok(())
}

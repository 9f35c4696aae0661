//! Generates the RSA key pair used to sign and verify tokens.
//!
//! Writes `private_key_v1.pem` (PKCS#8) and `public_key_v1.pem` (PKIX) to the
//! current directory and prints the base64 values expected by the
//! `PRIVATE_KEY_V1_B64` / `PUBLIC_KEY_V1_B64` environment variables.

use base64::{Engine, engine::general_purpose::STANDARD};
use trl_research_server::{
    keys::keygen::{DEFAULT_RSA_BITS, generate_rsa_keypair},
    result::{TrlResult, TrlResultHelper},
};

fn main() -> TrlResult<()> {
    let (private_pem, public_pem) = generate_rsa_keypair(DEFAULT_RSA_BITS)?;

    std::fs::write("private_key_v1.pem", &private_pem).context("cannot write private_key_v1.pem")?;
    std::fs::write("public_key_v1.pem", &public_pem).context("cannot write public_key_v1.pem")?;

    println!("Wrote private_key_v1.pem and public_key_v1.pem");
    println!();
    println!("PRIVATE_KEY_V1_B64={}", STANDARD.encode(private_pem.as_bytes()));
    println!("PUBLIC_KEY_V1_B64={}", STANDARD.encode(public_pem.as_bytes()));

    Ok(())
}

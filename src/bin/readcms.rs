use std::{env, fs};
use std::io::Read;
use cms_container::CmsContainer;


fn main() {
    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            println!("Usage: readcms <path>");
            return
        }
    };
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            println!("Can’t open file: {}", err);
            return;
        }
    };
    let mut data = Vec::new();
    if let Err(err) = file.read_to_end(&mut data) {
        println!("Can’t read file: {}", err);
        return;
    }

    let container = match CmsContainer::decode_padded(&data) {
        Ok(container) => container,
        Err(err) => {
            println!("Can’t decode container: {}", err);
            return
        }
    };

    if let Some(alg) = container.digest_algorithm() {
        println!("Digest algorithm: {}", alg);
    }
    println!("Certificates:");
    for cert in container.certificates() {
        println!("  {} ({})", cert.serial_number(), cert);
    }
    println!(
        "Revocation info: {} CRLs, {} OCSP responses, {} other",
        container.crls().count(),
        container.ocsp_responses().count(),
        container.other_revocation_info().count(),
    );
    let signer = match container.signer_info() {
        Some(signer) => signer,
        None => return
    };
    if let Some(cert) = signer.signing_certificate() {
        println!("Signer: {}", cert.serial_number());
    }
    println!("Signed attributes:");
    for attr in signer.signed_attrs() {
        println!("  {}", attr.attr_type());
    }
    if !signer.unsigned_attrs().is_empty() {
        println!("Unsigned attributes:");
        for attr in signer.unsigned_attrs() {
            println!("  {}", attr.attr_type());
        }
    }
}

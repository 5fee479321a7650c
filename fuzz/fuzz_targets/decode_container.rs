#![no_main]

use libfuzzer_sys::fuzz_target;
use cms_container::{Cert, CmsContainer, Crl, OcspResponse, SignerInfo};

fuzz_target!(|data: &[u8]| {
    let (which, data) = match data.split_first() {
        Some((first, data)) => (*first, data),
        None => return,
    };

    match which % 6 {
        0 => { let _ = CmsContainer::decode(data); },
        1 => { let _ = CmsContainer::decode_padded(data); },
        2 => { let _ = Cert::decode(data); },
        3 => { let _ = Crl::decode(data); },
        4 => { let _ = OcspResponse::decode(data); },
        5 => {
            if let Ok(container) = CmsContainer::decode(data) {
                let _ = SignerInfo::decode(
                    data, container.certificates()
                );
                let _ = container.serialize();
                let _ = container.size_estimation();
            }
        }
        _ => panic!("what?"),
    }
});

use gmsuite::sm4::modes::{sm4_decrypt, sm4_encrypt, Mode, Padding, Sm4Params};
use gmsuite::sm4::Sm4Key;
use gmsuite::util::{bytes_to_hex, hex_to_bytes, utf8_to_bytes};

fn key_16() -> [u8; 16] {
    hex_to_bytes("0123456789abcdeffedcba9876543210").unwrap().try_into().unwrap()
}

#[test]
fn single_block_ecb_matches_gm_t_vector() {
    let key = key_16();
    let block: [u8; 16] = hex_to_bytes("0123456789abcdeffedcba9876543210").unwrap().try_into().unwrap();
    let sched = Sm4Key::new(&key).unwrap();
    assert_eq!(bytes_to_hex(&sched.encrypt_block(&block)), "681edf34d206965e86b3e94f536e4246");
}

#[test]
fn ecb_pkcs7_matches_gm_t_vector() {
    let key = key_16();
    let pt = hex_to_bytes("0123456789abcdeffedcba9876543210").unwrap();
    let params = Sm4Params { mode: Mode::Ecb, iv: None, padding: Padding::Pkcs7 };
    let ct = sm4_encrypt(&pt, &key, &params).unwrap();
    assert_eq!(
        bytes_to_hex(&ct),
        "681edf34d206965e86b3e94f536e4246002a8a4efa863ccad024ac0300bb40d2"
    );
}

#[test]
fn cbc_utf8_matches_gm_t_vector() {
    let key = key_16();
    let iv: [u8; 16] = hex_to_bytes("fedcba98765432100123456789abcdef").unwrap().try_into().unwrap();
    let pt = utf8_to_bytes("hello world! 我是 juneandgreen.");
    let params = Sm4Params { mode: Mode::Cbc, iv: Some(&iv), padding: Padding::Pkcs7 };
    let ct = sm4_encrypt(&pt, &key, &params).unwrap();
    assert_eq!(
        bytes_to_hex(&ct),
        "0d6cfa73c823b2ac0d6a92c564171892000fbea90be7a4d440bc58a9044fcb5f3d1615d91a6dbfb4dfb0c6915071527b"
    );
    let back = sm4_decrypt(&ct, &key, &params).unwrap();
    assert_eq!(back, pt);
}

#[test]
#[ignore = "exercises a million sequential self-encryptions; run explicitly with --ignored"]
fn million_fold_self_encrypt_matches_gm_t_vector() {
    let key = key_16();
    let sched = Sm4Key::new(&key).unwrap();
    let mut block: [u8; 16] = hex_to_bytes("0123456789abcdeffedcba9876543210").unwrap().try_into().unwrap();
    for _ in 0..1_000_000 {
        block = sched.encrypt_block(&block);
    }
    assert_eq!(bytes_to_hex(&block), "595298c7c6fd271f0402f804c33d3f66");
}

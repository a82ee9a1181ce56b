use bounty_consensus::{
    parse_tx, ClaimContract, ClaimVerifier, PubKeyHash, Secp256k1Provider, SighashType,
    SpendContext, Tx, TxError, UtxoEntry, VerifyFlags,
};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct Request {
    op: String,

    #[serde(default)]
    tx_hex: String,

    #[serde(default)]
    input_index: u32,

    #[serde(default)]
    input_value: u64,

    #[serde(default)]
    script_code_hex: String,

    #[serde(default)]
    sighash_type: Option<u8>,

    #[serde(default)]
    pubkey_hex: String,

    #[serde(default)]
    open: bool,

    #[serde(default)]
    winner_hex: String,

    #[serde(default)]
    code_hex: String,

    #[serde(default)]
    locking_script_hex: String,
}

#[derive(Serialize, Default, Debug)]
struct Response {
    ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    txid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    consumed: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    digest: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pubkey_hash: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    covenant_data: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    locking_script: Option<String>,
}

impl Response {
    fn ok() -> Self {
        Self {
            ok: true,
            ..Self::default()
        }
    }

    fn fail(err: impl Into<String>) -> Self {
        Self {
            ok: false,
            err: Some(err.into()),
            ..Self::default()
        }
    }
}

fn is_truthy(v: Option<String>) -> bool {
    v.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

fn verify_flags_from(lookup: impl Fn(&str) -> Option<String>) -> VerifyFlags {
    VerifyFlags {
        require_low_s: is_truthy(lookup("BOUNTY_VERIFY_LOW_S")),
        require_compressed_pubkey: is_truthy(lookup("BOUNTY_VERIFY_COMPRESSED_ONLY")),
    }
}

fn verify_flags_from_env() -> VerifyFlags {
    verify_flags_from(|name| std::env::var(name).ok())
}

fn err_code(e: &TxError) -> String {
    e.code.as_str().to_string()
}

fn decode_hex(s: &str, what: &'static str) -> Result<Vec<u8>, Response> {
    hex::decode(s).map_err(|_| Response::fail(format!("bad {what}")))
}

/// Parses a whole transaction; trailing bytes are a parse error here.
fn decode_tx(tx_hex: &str) -> Result<Tx, Response> {
    let b = decode_hex(tx_hex, "tx_hex")?;
    let (tx, _txid, n) = parse_tx(&b).map_err(|e| Response::fail(err_code(&e)))?;
    if n != b.len() {
        return Err(Response::fail("TX_ERR_PARSE"));
    }
    Ok(tx)
}

fn op_hash160(req: &Request) -> Result<Response, Response> {
    let pubkey = decode_hex(&req.pubkey_hex, "pubkey_hex")?;
    Ok(Response {
        pubkey_hash: Some(hex::encode(PubKeyHash::of_pubkey(&pubkey).as_bytes())),
        ..Response::ok()
    })
}

fn op_parse_tx(req: &Request) -> Result<Response, Response> {
    let b = decode_hex(&req.tx_hex, "tx_hex")?;
    let (_tx, txid, n) = parse_tx(&b).map_err(|e| Response::fail(err_code(&e)))?;
    Ok(Response {
        txid: Some(hex::encode(txid)),
        consumed: Some(n),
        ..Response::ok()
    })
}

fn op_sighash(req: &Request, provider: &Secp256k1Provider) -> Result<Response, Response> {
    let tx = decode_tx(&req.tx_hex)?;
    let script_code = decode_hex(&req.script_code_hex, "script_code_hex")?;
    let sighash_type = SighashType::from_byte(req.sighash_type.unwrap_or(0x41))
        .map_err(|e| Response::fail(err_code(&e)))?;
    let digest = SpendContext::new(&tx, req.input_index, req.input_value, &script_code)
        .and_then(|ctx| ctx.sighash(provider, sighash_type))
        .map_err(|e| Response::fail(err_code(&e)))?;
    Ok(Response {
        digest: Some(hex::encode(digest)),
        ..Response::ok()
    })
}

fn contract_from_req(req: &Request) -> Result<ClaimContract, Response> {
    let winner = if req.winner_hex.is_empty() {
        PubKeyHash::UNASSIGNED
    } else {
        let b = decode_hex(&req.winner_hex, "winner_hex")?;
        PubKeyHash::from_slice(&b).map_err(|e| Response::fail(err_code(&e)))?
    };
    ClaimContract::new(req.open, winner).map_err(|e| Response::fail(err_code(&e)))
}

fn op_covenant_data(req: &Request) -> Result<Response, Response> {
    let contract = contract_from_req(req)?;
    Ok(Response {
        covenant_data: Some(hex::encode(contract.covenant_data())),
        ..Response::ok()
    })
}

fn op_locking_script(req: &Request) -> Result<Response, Response> {
    let contract = contract_from_req(req)?;
    let code = decode_hex(&req.code_hex, "code_hex")?;
    Ok(Response {
        locking_script: Some(hex::encode(contract.locking_script(&code))),
        ..Response::ok()
    })
}

fn op_claim(
    req: &Request,
    provider: &Secp256k1Provider,
    flags: VerifyFlags,
) -> Result<Response, Response> {
    let tx = decode_tx(&req.tx_hex)?;
    let entry = UtxoEntry {
        value: req.input_value,
        script_pubkey: decode_hex(&req.locking_script_hex, "locking_script_hex")?,
    };
    let verifier = ClaimVerifier::with_flags(provider, flags);
    verifier
        .validate_spend(&tx, req.input_index, &entry)
        .map_err(|e| Response::fail(e.as_str()))?;
    Ok(Response::ok())
}

fn main() {
    env_logger::init();

    let resp = match serde_json::from_reader::<_, Request>(std::io::stdin()) {
        Ok(req) => {
            log::debug!("op={}", req.op);
            let provider = Secp256k1Provider::new();
            let res = match req.op.as_str() {
                "hash160" => op_hash160(&req),
                "parse_tx" => op_parse_tx(&req),
                "sighash" => op_sighash(&req, &provider),
                "covenant_data" => op_covenant_data(&req),
                "locking_script" => op_locking_script(&req),
                "claim" => op_claim(&req, &provider, verify_flags_from_env()),
                _ => Err(Response::fail("unknown op")),
            };
            res.unwrap_or_else(|r| r)
        }
        Err(e) => Response::fail(format!("bad request: {e}")),
    };

    if let Err(e) = serde_json::to_writer(std::io::stdout(), &resp) {
        eprintln!("write response: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(json: &str) -> Request {
        serde_json::from_str(json).expect("request")
    }

    #[test]
    fn hash160_op() {
        let resp = op_hash160(&req(r#"{"op":"hash160","pubkey_hex":""}"#)).expect("ok");
        // hash160 of the empty string.
        assert_eq!(
            resp.pubkey_hash.as_deref(),
            Some("b472a266d0bd89c13706a4132ccfb16f7c3b9fcb")
        );
    }

    #[test]
    fn covenant_data_op_rejects_resolved_without_winner() {
        let resp = op_covenant_data(&req(r#"{"op":"covenant_data","open":false}"#)).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_COVENANT_DATA_INVALID"));

        let resp = op_covenant_data(&req(r#"{"op":"covenant_data","open":true}"#)).expect("ok");
        let want = format!("01{}", "00".repeat(20));
        assert_eq!(resp.covenant_data.as_deref(), Some(want.as_str()));
    }

    #[test]
    fn decode_tx_rejects_trailing_bytes() {
        // version=1, no inputs, no outputs, locktime=0, then one stray byte.
        let resp = decode_tx("01000000000000000000ff").unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_PARSE"));
        assert!(decode_tx("01000000000000000000").is_ok());
    }

    #[test]
    fn bad_hex_is_reported() {
        let resp = op_parse_tx(&req(r#"{"op":"parse_tx","tx_hex":"zz"}"#)).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("bad tx_hex"));
    }

    struct Signer {
        sk: secp256k1::SecretKey,
        pubkey: Vec<u8>,
    }

    fn signer(seed: u8, compressed: bool) -> Signer {
        let secp = secp256k1::Secp256k1::new();
        let sk = secp256k1::SecretKey::from_slice(&[seed; 32]).expect("valid scalar");
        let pk = secp256k1::PublicKey::from_secret_key(&secp, &sk);
        let pubkey = if compressed {
            pk.serialize().to_vec()
        } else {
            pk.serialize_uncompressed().to_vec()
        };
        Signer { sk, pubkey }
    }

    fn spending_tx() -> Tx {
        Tx {
            version: 1,
            inputs: vec![bounty_consensus::TxInput {
                prev_txid: [0x5a; 32],
                prev_vout: 0,
                script_sig: Vec::new(),
                sequence: 0xffff_ffff,
            }],
            outputs: vec![bounty_consensus::TxOutput {
                value: 9_000,
                script_pubkey: vec![0x51],
            }],
            locktime: 0,
        }
    }

    /// Builds a `claim` request where `s` signs and presents its key against
    /// a contract resolved to `winner`.
    fn claim_request(winner: &[u8], s: &Signer) -> String {
        let contract =
            ClaimContract::resolved(PubKeyHash::of_pubkey(winner)).expect("resolved");
        let locking = contract.locking_script(&[0x76, 0xac]);
        let mut tx = spending_tx();
        let digest = SpendContext::new(&tx, 0, 10_000, &locking)
            .and_then(|ctx| ctx.sighash(&Secp256k1Provider::new(), SighashType::ALL_FORKID))
            .expect("sighash");
        let mut sig = secp256k1::Secp256k1::new()
            .sign_ecdsa(&secp256k1::Message::from_digest(digest), &s.sk)
            .serialize_der()
            .to_vec();
        sig.push(SighashType::ALL_FORKID.as_byte());
        tx.inputs[0].script_sig = bounty_consensus::ClaimWitness {
            signature: sig,
            pubkey: s.pubkey.clone(),
        }
        .unlocking_script()
        .expect("unlocking script");

        format!(
            r#"{{"op":"claim","tx_hex":"{}","input_index":0,"input_value":10000,"locking_script_hex":"{}"}}"#,
            hex::encode(bounty_consensus::marshal_tx(&tx)),
            hex::encode(locking)
        )
    }

    #[test]
    fn sighash_op_matches_spend_context() {
        let tx = spending_tx();
        let script_code = [0x76, 0xa9, 0x88, 0xac];
        let json = format!(
            r#"{{"op":"sighash","tx_hex":"{}","input_index":0,"input_value":500,"script_code_hex":"{}","sighash_type":195}}"#,
            hex::encode(bounty_consensus::marshal_tx(&tx)),
            hex::encode(script_code)
        );
        let provider = Secp256k1Provider::new();
        let resp = op_sighash(&req(&json), &provider).expect("ok");

        let want = SpendContext::new(&tx, 0, 500, &script_code)
            .and_then(|ctx| ctx.sighash(&provider, SighashType::from_byte(0xc3)?))
            .expect("sighash");
        assert_eq!(resp.digest, Some(hex::encode(want)));
    }

    #[test]
    fn sighash_op_rejects_bad_type_and_index() {
        let tx_hex = hex::encode(bounty_consensus::marshal_tx(&spending_tx()));
        let provider = Secp256k1Provider::new();

        let json = format!(r#"{{"op":"sighash","tx_hex":"{tx_hex}","sighash_type":4}}"#);
        let resp = op_sighash(&req(&json), &provider).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_SIGHASH_TYPE_INVALID"));

        let json = format!(r#"{{"op":"sighash","tx_hex":"{tx_hex}","input_index":1}}"#);
        let resp = op_sighash(&req(&json), &provider).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_PARSE"));
    }

    #[test]
    fn locking_script_op_appends_state_trailer() {
        let winner = "11".repeat(20);
        let json = format!(
            r#"{{"op":"locking_script","open":false,"winner_hex":"{winner}","code_hex":"76ac"}}"#
        );
        let resp = op_locking_script(&req(&json)).expect("ok");
        let want = format!("76ac6a1500{winner}");
        assert_eq!(resp.locking_script.as_deref(), Some(want.as_str()));

        let resp = op_locking_script(&req(r#"{"op":"locking_script","open":false}"#)).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_COVENANT_DATA_INVALID"));
    }

    #[test]
    fn claim_op_round_trip() {
        let provider = Secp256k1Provider::new();
        let winner = signer(0x31, true);
        let other = signer(0x32, true);

        let resp = op_claim(
            &req(&claim_request(&winner.pubkey, &winner)),
            &provider,
            VerifyFlags::consensus(),
        )
        .expect("winner claims");
        assert!(resp.ok);

        let resp = op_claim(
            &req(&claim_request(&winner.pubkey, &other)),
            &provider,
            VerifyFlags::consensus(),
        )
        .unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("CLAIM_ERR_NOT_SELECTED_WINNER"));
    }

    #[test]
    fn claim_op_rejects_trailing_tx_bytes() {
        let s = signer(0x31, true);
        let mut r = req(&claim_request(&s.pubkey, &s));
        r.tx_hex.push_str("00");
        let resp = op_claim(&r, &Secp256k1Provider::new(), VerifyFlags::consensus()).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("TX_ERR_PARSE"));
    }

    #[test]
    fn claim_op_honours_compressed_only_flag() {
        let s = signer(0x33, false);
        let r = req(&claim_request(&s.pubkey, &s));
        let provider = Secp256k1Provider::new();
        assert!(op_claim(&r, &provider, VerifyFlags::consensus()).is_ok());

        let flags = verify_flags_from(|name| {
            (name == "BOUNTY_VERIFY_COMPRESSED_ONLY").then(|| "1".to_string())
        });
        let resp = op_claim(&r, &provider, flags).unwrap_err();
        assert_eq!(resp.err.as_deref(), Some("CLAIM_ERR_BAD_SIGNATURE"));
    }

    #[test]
    fn verify_flags_env_mapping() {
        assert_eq!(verify_flags_from(|_| None), VerifyFlags::consensus());
        assert_eq!(
            verify_flags_from(|_| Some("TRUE".to_string())),
            VerifyFlags::strict()
        );
        let flags = verify_flags_from(|name| match name {
            "BOUNTY_VERIFY_LOW_S" => Some("1".to_string()),
            _ => Some("yes".to_string()),
        });
        assert!(flags.require_low_s);
        assert!(!flags.require_compressed_pubkey);
    }
}

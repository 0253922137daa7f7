//! Bit-exact wire encodings of the exchanged structures: proofs, common
//! data (verification keys) and constraint systems. `decode(encode(x)) == x`
//! holds structurally, including gate and expression term order.

use super::cursor::ByteReader;
use super::error::{SerError, SerKind, SerResult};
use super::primitives::{
    read_digest, read_felt, read_i32, read_point, read_u32, read_u64, read_u8, read_usize,
    read_vec, write_digest, write_felt, write_i32, write_point, write_u32, write_u64, write_u8,
    write_usize, write_vec,
};
use crate::plonk::constraint_system::{
    ColumnKind, ConstraintSystem, CopyConstraint, Expression, Gate, LookupConstraint,
    LookupGate, LookupTable, TableDescription, Term, Variable,
};
use crate::plonk::indexer::{CommitmentParams, CommonData, PlonkEvaluations, PlonkProof};
use crate::poly_commit::fri::{FriProof, FriQueryProof, MerkleOpening};
use crate::poly_commit::kzg::{KzgCommitment, KzgProof};
use crate::poly_commit::lpc::{LpcCommitment, LpcProof, LpcQueryOpening};
use crate::poly_commit::merkle::MerklePath;
use ark_bls12_381::G1Affine;
use ark_ff::PrimeField;

/// The wire-format contract: big-endian, length-prefixed, self-describing
/// enough to decode without side information, and byte-exact under
/// `decode(encode(x)) == x`.
pub trait Wire: Sized {
    /// Append the canonical encoding.
    fn write(&self, out: &mut Vec<u8>);

    /// Decode one value, advancing the reader.
    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self>;

    /// Encode into a fresh buffer.
    fn to_wire_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write(&mut out);
        out
    }

    /// Decode an entire buffer; trailing bytes are an error.
    fn from_wire_bytes(bytes: &[u8]) -> SerResult<Self> {
        let mut reader = ByteReader::new(bytes);
        let value = Self::read(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(SerError::TrailingBytes {
                remaining: reader.remaining(),
            });
        }
        Ok(value)
    }
}

impl Wire for ColumnKind {
    fn write(&self, out: &mut Vec<u8>) {
        let tag = match self {
            ColumnKind::Witness => 0u8,
            ColumnKind::PublicInput => 1,
            ColumnKind::Constant => 2,
            ColumnKind::Selector => 3,
        };
        write_u8(out, tag);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        match read_u8(reader, SerKind::Expression, "column kind")? {
            0 => Ok(ColumnKind::Witness),
            1 => Ok(ColumnKind::PublicInput),
            2 => Ok(ColumnKind::Constant),
            3 => Ok(ColumnKind::Selector),
            _ => Err(SerError::InvalidTag {
                kind: SerKind::Expression,
                field: "column kind",
            }),
        }
    }
}

impl Wire for Variable {
    fn write(&self, out: &mut Vec<u8>) {
        self.kind.write(out);
        write_usize(out, self.index);
        write_i32(out, self.rotation);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(Variable {
            kind: ColumnKind::read(reader)?,
            index: read_usize(reader, SerKind::Expression, "column index")?,
            rotation: read_i32(reader, SerKind::Expression, "rotation")?,
        })
    }
}

impl<F: PrimeField> Wire for Term<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_felt(out, &self.coeff);
        write_vec(out, &self.vars, |out, var| var.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(Term {
            coeff: read_felt(reader, SerKind::Expression, "coefficient")?,
            vars: read_vec(reader, SerKind::Expression, "variables", Variable::read)?,
        })
    }
}

impl<F: PrimeField> Wire for Expression<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.terms, |out, term| term.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(Expression {
            terms: read_vec(reader, SerKind::Expression, "terms", Term::read)?,
        })
    }
}

impl<F: PrimeField> Wire for Gate<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_usize(out, self.selector);
        write_vec(out, &self.constraints, |out, c| c.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(Gate {
            selector: read_usize(reader, SerKind::Gate, "selector")?,
            constraints: read_vec(reader, SerKind::Gate, "constraints", Expression::read)?,
        })
    }
}

impl Wire for CopyConstraint {
    fn write(&self, out: &mut Vec<u8>) {
        self.left.write(out);
        self.right.write(out);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(CopyConstraint {
            left: Variable::read(reader)?,
            right: Variable::read(reader)?,
        })
    }
}

impl<F: PrimeField> Wire for LookupConstraint<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_u32(out, self.table_id);
        write_vec(out, &self.exprs, |out, e| e.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LookupConstraint {
            table_id: read_u32(reader, SerKind::Lookup, "table id")?,
            exprs: read_vec(reader, SerKind::Lookup, "expressions", Expression::read)?,
        })
    }
}

impl<F: PrimeField> Wire for LookupGate<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_usize(out, self.selector);
        write_vec(out, &self.constraints, |out, c| c.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LookupGate {
            selector: read_usize(reader, SerKind::Lookup, "selector")?,
            constraints: read_vec(
                reader,
                SerKind::Lookup,
                "constraints",
                LookupConstraint::read,
            )?,
        })
    }
}

impl Wire for LookupTable {
    fn write(&self, out: &mut Vec<u8>) {
        write_u32(out, self.id);
        write_usize(out, self.selector);
        write_vec(out, &self.options, |out, option| {
            write_vec(out, option, |out, col| write_usize(out, *col));
        });
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LookupTable {
            id: read_u32(reader, SerKind::Lookup, "table id")?,
            selector: read_usize(reader, SerKind::Lookup, "selector")?,
            options: read_vec(reader, SerKind::Lookup, "options", |r| {
                read_vec(r, SerKind::Lookup, "option columns", |r| {
                    read_usize(r, SerKind::Lookup, "column")
                })
            })?,
        })
    }
}

impl Wire for TableDescription {
    fn write(&self, out: &mut Vec<u8>) {
        write_usize(out, self.witness_columns);
        write_usize(out, self.public_input_columns);
        write_usize(out, self.constant_columns);
        write_usize(out, self.selector_columns);
        write_usize(out, self.usable_rows_amount);
        write_usize(out, self.rows_amount);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::ConstraintSystem;
        Ok(TableDescription {
            witness_columns: read_usize(reader, kind, "witness columns")?,
            public_input_columns: read_usize(reader, kind, "public input columns")?,
            constant_columns: read_usize(reader, kind, "constant columns")?,
            selector_columns: read_usize(reader, kind, "selector columns")?,
            usable_rows_amount: read_usize(reader, kind, "usable rows")?,
            rows_amount: read_usize(reader, kind, "rows")?,
        })
    }
}

impl<F: PrimeField> Wire for ConstraintSystem<F> {
    fn write(&self, out: &mut Vec<u8>) {
        self.table_description().write(out);
        write_vec(out, self.gates(), |out, gate| gate.write(out));
        write_vec(out, self.copy_constraints(), |out, copy| copy.write(out));
        write_vec(out, self.lookup_gates(), |out, gate| gate.write(out));
        write_vec(out, self.lookup_tables(), |out, table| table.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::ConstraintSystem;
        let table = TableDescription::read(reader)?;
        let gates = read_vec(reader, kind, "gates", Gate::read)?;
        let copies = read_vec(reader, kind, "copy constraints", CopyConstraint::read)?;
        let lookup_gates = read_vec(reader, kind, "lookup gates", LookupGate::read)?;
        let lookup_tables = read_vec(reader, kind, "lookup tables", LookupTable::read)?;
        ConstraintSystem::new(table, gates, copies, lookup_gates, lookup_tables).map_err(|_| {
            SerError::Invalid {
                kind,
                field: "bounds",
            }
        })
    }
}

impl Wire for CommitmentParams {
    fn write(&self, out: &mut Vec<u8>) {
        write_u32(out, self.lambda);
        write_u32(out, self.expand_factor);
        write_vec(out, &self.step_list, |out, s| write_u32(out, *s));
        write_u64(out, self.max_degree);
        write_u32(out, self.proof_of_work_bits);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::CommonData;
        Ok(CommitmentParams {
            lambda: read_u32(reader, kind, "lambda")?,
            expand_factor: read_u32(reader, kind, "expand factor")?,
            step_list: read_vec(reader, kind, "step list", |r| {
                read_u32(r, kind, "step")
            })?,
            max_degree: read_u64(reader, kind, "max degree")?,
            proof_of_work_bits: read_u32(reader, kind, "proof of work bits")?,
        })
    }
}

impl<C: Wire, F: PrimeField> Wire for CommonData<C, F> {
    fn write(&self, out: &mut Vec<u8>) {
        self.table.write(out);
        self.cm_fixed.write(out);
        write_vec(out, &self.k, |out, k| write_felt(out, k));
        write_felt(out, &self.root);
        write_usize(out, self.cs_size);
        write_usize(out, self.quot_factor);
        write_usize(out, self.quotient_chunks);
        write_usize(out, self.permuted_columns);
        self.pcs_params.write(out);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::CommonData;
        Ok(CommonData {
            table: TableDescription::read(reader)?,
            cm_fixed: C::read(reader)?,
            k: read_vec(reader, kind, "k", |r| read_felt(r, kind, "k"))?,
            root: read_felt(reader, kind, "root")?,
            cs_size: read_usize(reader, kind, "cs size")?,
            quot_factor: read_usize(reader, kind, "quotient factor")?,
            quotient_chunks: read_usize(reader, kind, "quotient chunks")?,
            permuted_columns: read_usize(reader, kind, "permuted columns")?,
            pcs_params: CommitmentParams::read(reader)?,
        })
    }
}

impl Wire for MerklePath {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.siblings, |out, digest| write_digest(out, digest));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(MerklePath {
            siblings: read_vec(reader, SerKind::Proof, "merkle path", |r| {
                read_digest(r, SerKind::Proof, "sibling")
            })?,
        })
    }
}

impl<F: PrimeField> Wire for MerkleOpening<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.values, |out, v| write_felt(out, v));
        self.path.write(out);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(MerkleOpening {
            values: read_vec(reader, SerKind::Proof, "leaf values", |r| {
                read_felt(r, SerKind::Proof, "value")
            })?,
            path: MerklePath::read(reader)?,
        })
    }
}

impl<F: PrimeField> Wire for FriQueryProof<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.rounds, |out, opening| opening.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(FriQueryProof {
            rounds: read_vec(reader, SerKind::Proof, "query rounds", MerkleOpening::read)?,
        })
    }
}

impl<F: PrimeField> Wire for FriProof<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.round_roots, |out, root| write_digest(out, root));
        write_vec(out, &self.final_poly, |out, coef| write_felt(out, coef));
        write_u64(out, self.pow_nonce);
        write_vec(out, &self.queries, |out, query| query.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::Proof;
        Ok(FriProof {
            round_roots: read_vec(reader, kind, "round roots", |r| {
                read_digest(r, kind, "root")
            })?,
            final_poly: read_vec(reader, kind, "final polynomial", |r| {
                read_felt(r, kind, "coefficient")
            })?,
            pow_nonce: read_u64(reader, kind, "pow nonce")?,
            queries: read_vec(reader, kind, "queries", FriQueryProof::read)?,
        })
    }
}

impl Wire for LpcCommitment {
    fn write(&self, out: &mut Vec<u8>) {
        write_digest(out, &self.0);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LpcCommitment(read_digest(
            reader,
            SerKind::Commitment,
            "root",
        )?))
    }
}

impl<F: PrimeField> Wire for LpcQueryOpening<F> {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.batches, |out, batch| {
            write_vec(out, batch, |out, opening| opening.write(out));
        });
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LpcQueryOpening {
            batches: read_vec(reader, SerKind::Proof, "batch openings", |r| {
                read_vec(r, SerKind::Proof, "positions", MerkleOpening::read)
            })?,
        })
    }
}

impl<F: PrimeField> Wire for LpcProof<F> {
    fn write(&self, out: &mut Vec<u8>) {
        self.fri.write(out);
        write_vec(out, &self.query_openings, |out, opening| opening.write(out));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(LpcProof {
            fri: FriProof::read(reader)?,
            query_openings: read_vec(
                reader,
                SerKind::Proof,
                "query openings",
                LpcQueryOpening::read,
            )?,
        })
    }
}

impl Wire for KzgCommitment {
    fn write(&self, out: &mut Vec<u8>) {
        write_vec(out, &self.0, |out, point| write_point(out, point));
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(KzgCommitment(read_vec(
            reader,
            SerKind::Commitment,
            "points",
            |r| read_point::<G1Affine>(r, SerKind::Commitment, "point"),
        )?))
    }
}

impl Wire for KzgProof {
    fn write(&self, out: &mut Vec<u8>) {
        write_point(out, &self.cm_q);
        write_point(out, &self.opening);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(KzgProof {
            cm_q: read_point(reader, SerKind::Proof, "quotient commitment")?,
            opening: read_point(reader, SerKind::Proof, "opening witness")?,
        })
    }
}

impl<F: PrimeField> Wire for PlonkEvaluations<F> {
    fn write(&self, out: &mut Vec<u8>) {
        let felts = |out: &mut Vec<u8>, values: &[F]| {
            write_vec(out, values, |out, v| write_felt(out, v));
        };
        write_vec(out, &self.witness, |out, col| felts(out, col));
        felts(out, &self.multiplicities);
        write_vec(out, &self.selectors, |out, col| felts(out, col));
        write_vec(out, &self.constants, |out, col| felts(out, col));
        felts(out, &self.sigmas);
        write_felt(out, &self.z_perm);
        write_felt(out, &self.z_perm_omega);
        felts(out, &self.z_lookup);
        felts(out, &self.lookup_h);
        felts(out, &self.lookup_g);
        felts(out, &self.quotient);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let kind = SerKind::Proof;
        let felts = |r: &mut ByteReader<'_>, field: &'static str| -> SerResult<Vec<F>> {
            read_vec(r, kind, field, |r| read_felt(r, kind, field))
        };
        Ok(PlonkEvaluations {
            witness: read_vec(reader, kind, "witness evals", |r| felts(r, "witness evals"))?,
            multiplicities: felts(reader, "multiplicity evals")?,
            selectors: read_vec(reader, kind, "selector evals", |r| {
                felts(r, "selector evals")
            })?,
            constants: read_vec(reader, kind, "constant evals", |r| {
                felts(r, "constant evals")
            })?,
            sigmas: felts(reader, "sigma evals")?,
            z_perm: read_felt(reader, kind, "z_perm")?,
            z_perm_omega: read_felt(reader, kind, "z_perm omega")?,
            z_lookup: felts(reader, "z_lookup")?,
            lookup_h: felts(reader, "lookup h")?,
            lookup_g: felts(reader, "lookup g")?,
            quotient: felts(reader, "quotient evals")?,
        })
    }
}

impl<C: Wire, F: PrimeField, E: Wire> Wire for PlonkProof<C, F, E> {
    fn write(&self, out: &mut Vec<u8>) {
        self.cm_witness.write(out);
        self.cm_aux.write(out);
        self.cm_quotient.write(out);
        self.evals.write(out);
        self.eval_proof.write(out);
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        Ok(PlonkProof {
            cm_witness: C::read(reader)?,
            cm_aux: C::read(reader)?,
            cm_quotient: C::read(reader)?,
            evals: PlonkEvaluations::read(reader)?,
            eval_proof: E::read(reader)?,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::plonk::constraint_system::{
        AssignmentTable, PrivateAssignment, PublicAssignment,
    };
    use crate::plonk::indexer::indexer;
    use crate::plonk::prover::prover;
    use crate::poly_commit::lpc::{LpcParams, LpcScheme};
    use ark_bls12_381::Fr;
    use ark_std::rand::SeedableRng;
    use merlin::Transcript;
    use rand_chacha::ChaChaRng;

    fn sample_cs() -> ConstraintSystem<Fr> {
        let table = TableDescription::new(3, 1, 1, 2, 5);
        let w = |i: usize| Expression::from_variable(Variable::witness(i));
        let gate = Gate {
            selector: 0,
            constraints: vec![
                w(0).add(&w(1)).sub(&w(2)),
                w(0).mul(&w(1)).sub(&Expression::from_variable(
                    Variable::witness(2).with_rotation(1),
                )),
            ],
        };
        let copy = CopyConstraint {
            left: Variable::new(ColumnKind::Witness, 0, 2),
            right: Variable::new(ColumnKind::Witness, 1, 4),
        };
        let lookup_gate = LookupGate {
            selector: 1,
            constraints: vec![LookupConstraint {
                table_id: 3,
                exprs: vec![w(0).scale(&Fr::from(2u64))],
            }],
        };
        let lookup_table = LookupTable {
            id: 3,
            selector: 1,
            options: vec![vec![0]],
        };
        ConstraintSystem::new(
            table,
            vec![gate],
            vec![copy],
            vec![lookup_gate],
            vec![lookup_table],
        )
        .unwrap()
    }

    #[test]
    fn constraint_system_round_trip() {
        let cs = sample_cs();
        let bytes = cs.to_wire_bytes();
        let decoded = ConstraintSystem::<Fr>::from_wire_bytes(&bytes).unwrap();
        assert_eq!(cs, decoded);

        // byte-buffer write/read cycle
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&bytes);
        let reread = ConstraintSystem::<Fr>::from_wire_bytes(&buffer).unwrap();
        assert_eq!(cs, reread);
    }

    #[test]
    fn truncated_constraint_system_fails() {
        let cs = sample_cs();
        let bytes = cs.to_wire_bytes();
        for cut in [1usize, bytes.len() / 2, bytes.len() - 1] {
            assert!(ConstraintSystem::<Fr>::from_wire_bytes(&bytes[..cut]).is_err());
        }
        let mut extended = bytes.clone();
        extended.push(0);
        assert!(matches!(
            ConstraintSystem::<Fr>::from_wire_bytes(&extended),
            Err(SerError::TrailingBytes { .. })
        ));
    }

    #[test]
    fn out_of_bounds_index_fails_decode() {
        let cs = sample_cs();
        let mut bytes = Vec::new();
        // corrupt the table description so the gate selector is out of range
        let mut table = *cs.table_description();
        table.selector_columns = 1;
        table.write(&mut bytes);
        write_vec(&mut bytes, cs.gates(), |out, gate| gate.write(out));
        write_vec(&mut bytes, cs.copy_constraints(), |out, c| c.write(out));
        write_vec(&mut bytes, cs.lookup_gates(), |out, g| g.write(out));
        write_vec(&mut bytes, cs.lookup_tables(), |out, t| t.write(out));
        assert!(matches!(
            ConstraintSystem::<Fr>::from_wire_bytes(&bytes),
            Err(SerError::Invalid { .. })
        ));
    }

    #[test]
    fn proof_and_common_data_round_trip() {
        let table = TableDescription::new(3, 0, 0, 1, 4);
        let w = |i: usize| Expression::from_variable(Variable::witness(i));
        let gate = Gate {
            selector: 0,
            constraints: vec![w(0).add(&w(1)).sub(&w(2))],
        };
        let cs = ConstraintSystem::new(table, vec![gate], vec![], vec![], vec![]).unwrap();
        let assignment = AssignmentTable {
            public: PublicAssignment {
                public_inputs: vec![],
                constants: vec![],
                selectors: vec![vec![Fr::from(1u64); 4]],
            },
            private: PrivateAssignment {
                witness: vec![
                    vec![Fr::from(1u64); 4],
                    vec![Fr::from(2u64); 4],
                    vec![Fr::from(3u64); 4],
                ],
            },
        };

        let n = cs.table_description().rows_amount;
        let lpc_params = LpcParams {
            max_degree: n + 2,
            expand_factor: 3,
            step_list: vec![1, 1],
            lambda: 8,
            proof_of_work_bits: 0,
        };
        let record = CommitmentParams::from_lpc(&lpc_params);
        let pcs = LpcScheme::<Fr>::new(lpc_params).unwrap();
        let params = indexer(&cs, &assignment.public, &pcs, record).unwrap();

        let common = params.get_verifier_params_ref();
        let common_bytes = common.to_wire_bytes();
        let decoded = CommonData::<LpcCommitment, Fr>::from_wire_bytes(&common_bytes).unwrap();
        assert_eq!(*common, decoded);

        let mut prng = ChaChaRng::from_seed([3u8; 32]);
        let mut transcript = Transcript::new(b"wire test");
        let proof = prover(&mut prng, &mut transcript, &pcs, &cs, &params, &assignment).unwrap();
        let proof_bytes = proof.to_wire_bytes();
        let decoded =
            PlonkProof::<LpcCommitment, Fr, LpcProof<Fr>>::from_wire_bytes(&proof_bytes)
                .unwrap();
        assert_eq!(proof, decoded);

        for cut in [0usize, proof_bytes.len() / 3, proof_bytes.len() - 1] {
            assert!(PlonkProof::<LpcCommitment, Fr, LpcProof<Fr>>::from_wire_bytes(
                &proof_bytes[..cut]
            )
            .is_err());
        }
    }

    #[test]
    fn kzg_structures_round_trip() {
        use crate::poly_commit::field_polynomial::FpPolynomial;
        use crate::poly_commit::kzg::KzgScheme;
        use crate::poly_commit::pcs::{BatchOpeningRef, PolyComScheme};
        use ark_std::UniformRand;

        let mut prng = ChaChaRng::from_seed([5u8; 32]);
        let pcs = KzgScheme::new(8, &mut prng);
        let polys: Vec<FpPolynomial<Fr>> =
            (0..2).map(|_| FpPolynomial::random(&mut prng, 6)).collect();
        let commitment = pcs.commit(&polys).unwrap();
        let decoded = KzgCommitment::from_wire_bytes(&commitment.to_wire_bytes()).unwrap();
        assert_eq!(commitment, decoded);

        let zeta = Fr::rand(&mut prng);
        let points = vec![vec![zeta], vec![zeta]];
        let mut transcript = Transcript::new(b"kzg wire");
        let proof = pcs
            .proof_eval(
                &mut transcript,
                &[BatchOpeningRef {
                    polys: &polys,
                    points: &points,
                }],
            )
            .unwrap();
        let decoded = KzgProof::from_wire_bytes(&proof.to_wire_bytes()).unwrap();
        assert_eq!(proof, decoded);
    }
}

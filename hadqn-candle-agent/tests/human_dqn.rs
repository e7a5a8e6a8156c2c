use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::VarMap;
use hadqn_candle_agent::{
    dqn::{HumanDqn, HumanDqnConfig, TargetKind},
    mlp::MlpConfig,
    opt::OptimizerConfig,
    qnet::{QNet, QNetConfig, TorsoConfig},
};
use hadqn_core::{
    replay_buffer::{SimpleReplayBuffer, SimpleReplayBufferConfig},
    Agent, AgentConfig, Obs, QLearner, ReplayBufferBase, Transition, TransitionBatch,
};
use ndarray::{ArrayD, IxDyn};
use std::collections::BTreeMap;

const OBS_DIM: usize = 4;
const N_ACTIONS: usize = 3;

fn mlp_config(dueling: bool, double_dqn: bool) -> HumanDqnConfig<QNetConfig> {
    let torso = TorsoConfig::Mlp(MlpConfig::new(OBS_DIM, vec![16], 16, true));
    HumanDqnConfig::default()
        .model_config(QNetConfig::new(torso, N_ACTIONS).dueling(dueling))
        .opt_config(OptimizerConfig::Adam { lr: 1e-2 })
        .double_dqn(double_dqn)
        .gamma(0.9)
}

/// One input, two actions, `Q(x) = head.weight * x + head.bias`.
fn toy_config(target: TargetKind) -> HumanDqnConfig<QNetConfig> {
    let torso = TorsoConfig::Mlp(MlpConfig::new(1, vec![], 1, false));
    HumanDqnConfig::default()
        .model_config(QNetConfig::new(torso, 2))
        .target(target)
        .gamma(0.5)
}

fn set(vm: &VarMap, name: &str, values: &[f32], shape: &[usize]) -> Result<()> {
    let t = Tensor::from_slice(values, shape, &Device::Cpu)?;
    vm.data().lock().unwrap().get(name).unwrap().set(&t)?;
    Ok(())
}

/// Makes the toy network output `head_bias` for every input.
fn set_toy(vm: &VarMap, head_bias: [f32; 2]) -> Result<()> {
    set(vm, "torso.ln0.weight", &[1.0], &[1, 1])?;
    set(vm, "torso.ln0.bias", &[0.0], &[1])?;
    set(vm, "head.weight", &[0.0, 0.0], &[2, 1])?;
    set(vm, "head.bias", &head_bias, &[2])
}

fn params(vm: &VarMap) -> Result<BTreeMap<String, Vec<f32>>> {
    let data = vm.data().lock().unwrap();
    data.iter()
        .map(|(k, v)| Ok((k.clone(), v.as_tensor().flatten_all()?.to_vec1::<f32>()?)))
        .collect()
}

fn obs(k: usize) -> Obs {
    ArrayD::from_shape_fn(IxDyn(&[OBS_DIM]), |ix| ((k * 7 + ix[0] * 3) % 5) as f32 / 5.0)
}

fn batch(n: usize, same_actions: bool) -> TransitionBatch {
    (0..n)
        .map(|k| {
            let action = k % N_ACTIONS;
            let human_action = match same_actions {
                true => action,
                false => (k + 1) % N_ACTIONS,
            };
            Transition::new(obs(k), action, obs(k + 1), 0.0, false, human_action, 1.0)
        })
        .collect()
}

#[test]
fn test_double_and_vanilla_targets_differ() -> Result<()> {
    let next_obs = Tensor::from_slice(&[1f32], (1, 1), &Device::Cpu)?;
    let mut values = vec![];

    for target in [TargetKind::Vanilla, TargetKind::Double] {
        let dqn = HumanDqn::<QNet>::build(toy_config(target))?;
        // The moving network prefers action 1, the target network action 0
        set_toy(dqn.varmap(), [1.0, 2.0])?;
        set_toy(dqn.target_varmap(), [3.0, 0.0])?;
        values.push(dqn.bootstrap_value(&next_obs)?.to_vec1::<f32>()?[0]);
    }

    assert_eq!(values, vec![3.0, 0.0]);
    Ok(())
}

#[test]
fn test_double_and_vanilla_targets_agree() -> Result<()> {
    let next_obs = Tensor::from_slice(&[1f32], (1, 1), &Device::Cpu)?;

    for target in [TargetKind::Vanilla, TargetKind::Double] {
        let dqn = HumanDqn::<QNet>::build(toy_config(target))?;
        set_toy(dqn.varmap(), [1.0, 2.0])?;
        set_toy(dqn.target_varmap(), [0.0, 3.0])?;
        assert_eq!(dqn.bootstrap_value(&next_obs)?.to_vec1::<f32>()?, vec![3.0]);
    }
    Ok(())
}

#[test]
fn test_loss_uses_human_reward_and_discount() -> Result<()> {
    let dqn = HumanDqn::<QNet>::build(toy_config(TargetKind::Vanilla).multi_step(2))?;
    set_toy(dqn.varmap(), [1.0, 2.0])?;
    set_toy(dqn.target_varmap(), [4.0, 0.0])?;

    let state = ArrayD::from_elem(IxDyn(&[1]), 1.0);
    // reward and done do not enter the target
    let tr = Transition::new(state.clone(), 0, state, -100.0, true, 1, 1.0);
    let terms = dqn.calc_loss(&vec![tr].into_iter().collect())?;

    // q_target = 1 + 0.5^2 * 4 = 2, q_robot = 1
    let mse = terms.mse.to_scalar::<f32>()?;
    assert!((mse - 1.0).abs() < 1e-6);

    // log_softmax([q_human, q_robot])[0] = log(e^2 / (e^2 + e^1))
    let expected = 2.0 - (2f32.exp() + 1f32.exp()).ln();
    let imitation = terms.imitation.to_scalar::<f32>()?;
    assert!((imitation - expected).abs() < 1e-6);

    let total = terms.total.to_scalar::<f32>()?;
    assert!((total - (mse + imitation)).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_imitation_term_is_log_half_for_identical_actions() -> Result<()> {
    let dqn = HumanDqn::<QNet>::build(mlp_config(false, false))?;
    let terms = dqn.calc_loss(&batch(16, true))?;
    let imitation = terms.imitation.to_scalar::<f32>()?;
    assert!((imitation - 0.5f32.ln()).abs() < 1e-6);
    Ok(())
}

#[test]
fn test_imitation_weight_scales_the_term() -> Result<()> {
    let dqn = HumanDqn::<QNet>::build(mlp_config(false, false).imitation_weight(0.0))?;
    let terms = dqn.calc_loss(&batch(8, false))?;
    assert_eq!(
        terms.total.to_scalar::<f32>()?,
        terms.mse.to_scalar::<f32>()?
    );
    Ok(())
}

#[test]
fn test_greedy_action_is_argmax() -> Result<()> {
    let dqn = HumanDqn::<QNet>::build(toy_config(TargetKind::Vanilla))?;
    let state = ArrayD::from_elem(IxDyn(&[1]), 0.5);

    set_toy(dqn.varmap(), [1.0, 2.0])?;
    assert_eq!(dqn.greedy_action(&state)?, 1);
    set_toy(dqn.varmap(), [5.0, 2.0])?;
    assert_eq!(dqn.greedy_action(&state)?, 0);

    // The target network is not consulted
    set_toy(dqn.target_varmap(), [0.0, 9.0])?;
    assert_eq!(dqn.greedy_action(&state)?, 0);
    Ok(())
}

#[test]
fn test_improve_updates_moving_network_only() -> Result<()> {
    for (dueling, double_dqn) in [(false, false), (true, true)] {
        let mut dqn = HumanDqn::<QNet>::build(mlp_config(dueling, double_dqn))?;
        let moving = params(dqn.varmap())?;
        let target = params(dqn.target_varmap())?;
        assert_eq!(moving, target);

        let loss = dqn.improve(batch(8, false))?;
        assert!(loss.is_finite());
        assert_eq!(dqn.n_opts(), 1);
        assert_ne!(params(dqn.varmap())?, moving);
        assert_eq!(params(dqn.target_varmap())?, target);
    }
    Ok(())
}

#[test]
fn test_update_target_is_bit_exact() -> Result<()> {
    let mut dqn = HumanDqn::<QNet>::build(mlp_config(true, true))?;
    for _ in 0..3 {
        dqn.improve(batch(8, false))?;
    }
    assert_ne!(params(dqn.varmap())?, params(dqn.target_varmap())?);

    dqn.update_target()?;
    let moving = params(dqn.varmap())?;
    let target = params(dqn.target_varmap())?;
    assert_eq!(moving.len(), target.len());
    for (k, v) in moving.iter() {
        let w = &target[k];
        assert!(v.iter().zip(w.iter()).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    // Training after the sync does not touch the target
    dqn.improve(batch(8, false))?;
    assert_eq!(params(dqn.target_varmap())?, target);
    Ok(())
}

#[test]
fn test_target_synced_every_n_iterations() -> Result<()> {
    let dqn = HumanDqn::<QNet>::build(mlp_config(false, true))?;
    let buffer = SimpleReplayBuffer::build(
        &SimpleReplayBufferConfig::default()
            .capacity(100)
            .minimum(2),
    )?;
    let config = AgentConfig::default().n_iter_update_nn(3).eps_decay(100.0);
    let mut agent = Agent::build(&config, dqn, buffer)?;

    for k in 1..=10 {
        let action = agent.select_eps_greedy_action(&obs(k))?;
        agent.add_to_buffer(obs(k), action, obs(k + 1), 0.0, false, k % N_ACTIONS, 1.0)?;
        agent.sample_and_improve(4)?;

        let moving = params(agent.learner().varmap())?;
        let target = params(agent.learner().target_varmap())?;
        match k {
            3 | 6 | 9 => assert_eq!(moving, target, "not synced at step {}", k),
            // Optimization starts at the 3rd step
            4 | 5 | 7 | 8 | 10 => assert_ne!(moving, target, "synced at step {}", k),
            _ => {}
        }
    }
    assert_eq!(agent.learner().n_opts(), 8);
    assert_eq!(agent.buffer().len(), 10);
    Ok(())
}

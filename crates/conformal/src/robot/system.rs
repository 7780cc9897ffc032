use super::{Joint, KinematicChain, Limits, Link};
use crate::error::{Error, Result};
use crate::scalar::*;
use log::debug;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

/// A tree of links connected by joints
///
/// Links and joints are owned by the system and looked up by name.
/// After [finalize](System::finalize), the actuated joints are numbered
/// in depth-first order from the root link, which fixes the layout of
/// every configuration vector, and one kinematic chain is created
/// for every joint at a leaf of the tree.
#[derive(Clone, Debug)]
pub struct System<T> {
    name: String,
    links: Vec<Link<T>>,
    joints: Vec<Joint<T>>,
    link_ids: HashMap<String, usize>,
    joint_ids: HashMap<String, usize>,
    chains: BTreeMap<String, KinematicChain<T>>,
    // Joint ids of the actuated joints, in DOF order
    actuated: Vec<usize>,
    // Link ids in breadth-first order from the root
    pub(crate) link_order: Vec<usize>,
    root: Option<usize>,
    finalized: bool,
}

impl<T: Real> Default for System<T> {
    fn default() -> Self {
        System::new("")
    }
}

impl<T: Real> System<T> {
    pub fn new(name: impl Into<String>) -> System<T> {
        System {
            name: name.into(),
            links: vec![],
            joints: vec![],
            link_ids: HashMap::new(),
            joint_ids: HashMap::new(),
            chains: BTreeMap::new(),
            actuated: vec![],
            link_order: vec![],
            root: None,
            finalized: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_link(&mut self, link: Link<T>) -> Result<()> {
        if self.link_ids.contains_key(link.name()) {
            return Err(Error::topology(format!("duplicate link {:?}", link.name())));
        }
        self.link_ids.insert(link.name().to_owned(), self.links.len());
        self.links.push(link);
        self.finalized = false;
        Ok(())
    }

    /// Add a joint between two existing links
    pub fn add_joint(&mut self, joint: Joint<T>) -> Result<()> {
        if self.joint_ids.contains_key(joint.name()) {
            return Err(Error::topology(format!("duplicate joint {:?}", joint.name())));
        }
        let parent = *self.link_ids.get(joint.parent_link()).ok_or_else(|| {
            Error::topology(format!(
                "joint {:?} has unknown parent link {:?}",
                joint.name(),
                joint.parent_link()
            ))
        })?;
        let child = *self.link_ids.get(joint.child_link()).ok_or_else(|| {
            Error::topology(format!(
                "joint {:?} has unknown child link {:?}",
                joint.name(),
                joint.child_link()
            ))
        })?;
        if parent == child {
            return Err(Error::topology(format!("joint {:?} connects a link to itself", joint.name())));
        }
        if let Some(existing) = &self.links[child].parent_joint {
            return Err(Error::topology(format!(
                "link {:?} already has parent joint {:?}",
                joint.child_link(),
                existing
            )));
        }

        let name = joint.name().to_owned();
        self.links[parent].child_joints.push(name.clone());
        self.links[child].parent_joint = Some(name.clone());
        self.joint_ids.insert(name, self.joints.len());
        self.joints.push(joint);
        self.finalized = false;
        Ok(())
    }

    /// Check the topology, number the actuated joints and create the leaf chains
    pub fn finalize(&mut self) -> Result<()> {
        let roots: Vec<usize> = (0..self.links.len())
            .filter(|&i| self.links[i].parent_joint.is_none())
            .collect();
        let root = match roots[..] {
            [root] => root,
            [] => return Err(Error::topology("no root link")),
            _ => {
                let names: Vec<&str> = roots.iter().map(|&i| self.links[i].name()).collect();
                return Err(Error::topology(format!("multiple root links {names:?}")));
            }
        };

        // Depth-first numbering of the actuated joints
        self.actuated.clear();
        let mut visited = vec![false; self.links.len()];
        let mut stack = vec![root];
        while let Some(link_id) = stack.pop() {
            visited[link_id] = true;
            for joint_name in self.links[link_id].child_joints.iter().rev() {
                let joint_id = self.joint_ids[joint_name];
                stack.push(self.link_ids[self.joints[joint_id].child_link()]);
            }
            if let Some(parent_joint) = &self.links[link_id].parent_joint {
                let joint_id = self.joint_ids[parent_joint];
                if self.joints[joint_id].is_actuated() {
                    self.actuated.push(joint_id);
                }
            }
        }
        // Every link has at most one parent, so a cycle is never reachable from the root
        if let Some(unreachable) = visited.iter().position(|v| !v) {
            return Err(Error::topology(format!(
                "link {:?} is not connected to the root (or is part of a cycle)",
                self.links[unreachable].name()
            )));
        }

        // Breadth-first link order for the dynamics passes
        self.link_order = vec![root];
        let mut i = 0;
        while i < self.link_order.len() {
            let link_id = self.link_order[i];
            for joint_name in self.links[link_id].child_joints.iter() {
                let joint_id = self.joint_ids[joint_name];
                self.link_order.push(self.link_ids[self.joints[joint_id].child_link()]);
            }
            i += 1;
        }

        self.root = Some(root);
        self.finalized = true;

        let leaf_joints: Vec<String> = self
            .joints
            .iter()
            .filter(|joint| self.links[self.link_ids[joint.child_link()]].child_joints.is_empty())
            .map(|joint| joint.name().to_owned())
            .collect();
        for joint_name in leaf_joints {
            if !self.chains.contains_key(&joint_name) {
                self.create_kinematic_chain(&joint_name)?;
            }
        }

        debug!(
            "finalized system {:?}: {} links, {} joints, {} DOF, {} chains",
            self.name,
            self.links.len(),
            self.joints.len(),
            self.actuated.len(),
            self.chains.len()
        );
        Ok(())
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub(crate) fn check_finalized(&self) -> Result<()> {
        if self.finalized {
            Ok(())
        } else {
            Err(Error::SystemNotFinalized)
        }
    }

    pub fn get_link(&self, name: &str) -> Result<&Link<T>> {
        self.link_ids
            .get(name)
            .map(|&i| &self.links[i])
            .ok_or_else(|| Error::not_found("link", name))
    }

    pub fn get_link_mut(&mut self, name: &str) -> Result<&mut Link<T>> {
        match self.link_ids.get(name) {
            Some(&i) => Ok(&mut self.links[i]),
            None => Err(Error::not_found("link", name)),
        }
    }

    pub fn get_joint(&self, name: &str) -> Result<&Joint<T>> {
        self.joint_ids
            .get(name)
            .map(|&i| &self.joints[i])
            .ok_or_else(|| Error::not_found("joint", name))
    }

    pub fn links(&self) -> &[Link<T>] {
        &self.links
    }

    pub fn joints(&self) -> &[Joint<T>] {
        &self.joints
    }

    /// The actuated joints, in DOF order
    pub fn actuated_joints(&self) -> impl Iterator<Item = &Joint<T>> {
        self.actuated.iter().map(|&i| &self.joints[i])
    }

    pub fn base_link(&self) -> Result<&Link<T>> {
        self.check_finalized()?;
        self.root
            .map(|i| &self.links[i])
            .ok_or(Error::SystemNotFinalized)
    }

    pub fn dof(&self) -> usize {
        self.actuated.len()
    }

    /// The DOF index of an actuated joint
    pub(crate) fn dof_index(&self, joint_name: &str) -> Option<usize> {
        let joint_id = *self.joint_ids.get(joint_name)?;
        self.actuated.iter().position(|&i| i == joint_id)
    }

    pub(crate) fn link_id(&self, name: &str) -> Option<usize> {
        self.link_ids.get(name).copied()
    }

    pub(crate) fn joint_id(&self, name: &str) -> Option<usize> {
        self.joint_ids.get(name).copied()
    }

    pub fn add_kinematic_chain(&mut self, name: impl Into<String>, mut chain: KinematicChain<T>) {
        chain.finalize();
        self.chains.insert(name.into(), chain);
    }

    /// Build the chain from the root link to the child link of `tip_joint`
    ///
    /// The chain is stored under the name of the tip joint.
    pub fn create_kinematic_chain(&mut self, tip_joint: &str) -> Result<&KinematicChain<T>> {
        self.check_finalized()?;
        let mut path = vec![];
        let mut joint_id = self.joint_id(tip_joint).ok_or_else(|| Error::not_found("joint", tip_joint))?;
        loop {
            path.push(joint_id);
            let parent = &self.links[self.link_ids[self.joints[joint_id].parent_link()]];
            match &parent.parent_joint {
                Some(name) => joint_id = self.joint_ids[name],
                None => break,
            }
        }

        let mut chain = KinematicChain::new();
        for &joint_id in path.iter().rev() {
            let joint = &self.joints[joint_id];
            if joint.is_actuated() {
                chain.add_actuated_joint(joint.clone())?;
            } else {
                chain.add_fixed_motor(joint.frame())?;
            }
        }
        chain.finalize();
        debug!("created kinematic chain {:?} with {} DOF", tip_joint, chain.dof());

        let chain = self.chains.entry(tip_joint.to_owned()).or_insert(chain);
        Ok(chain)
    }

    pub fn has_kinematic_chain(&self, name: &str) -> bool {
        self.chains.contains_key(name)
    }

    pub fn get_kinematic_chain(&self, name: &str) -> Result<&KinematicChain<T>> {
        self.chains.get(name).ok_or_else(|| Error::not_found("kinematic chain", name))
    }

    pub fn set_joint_limits(&mut self, joint_name: &str, limits: Limits<T>) -> Result<()> {
        if limits.position_lower > limits.position_upper {
            return Err(Error::InvalidLimits(joint_name.to_owned()));
        }
        let joint_id = self.joint_id(joint_name).ok_or_else(|| Error::not_found("joint", joint_name))?;
        self.joints[joint_id].set_limits(limits);
        for chain in self.chains.values_mut() {
            // Chains hold their own copy of each joint
            chain.update_joint_limits(joint_name, limits);
        }
        Ok(())
    }

    pub fn joint_limits_min(&self) -> Vec<T> {
        self.actuated_joints().map(|joint| joint.limits().position_lower).collect()
    }

    pub fn joint_limits_max(&self) -> Vec<T> {
        self.actuated_joints().map(|joint| joint.limits().position_upper).collect()
    }

    pub fn is_joint_position_feasible(&self, positions: &[T]) -> Result<bool> {
        self.check_finalized()?;
        Error::check_dof(self.dof(), positions.len())?;
        Ok(self
            .actuated_joints()
            .zip(positions.iter())
            .all(|(joint, &q)| joint.limits().contains(q)))
    }

    /// A configuration drawn uniformly within the joint limits
    pub fn random_configuration<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<T>> {
        self.check_finalized()?;
        Ok(self
            .actuated_joints()
            .map(|joint| {
                let limits = joint.limits();
                let (lower, upper) = (limits.position_lower.to_f64(), limits.position_upper.to_f64());
                if lower < upper {
                    T::from_f64(rng.gen_range(lower..upper))
                } else {
                    limits.position_lower
                }
            })
            .collect())
    }

    pub(crate) fn link_by_id(&self, id: usize) -> &Link<T> {
        &self.links[id]
    }
}
